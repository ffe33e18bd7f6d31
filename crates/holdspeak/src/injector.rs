//! Keystroke injection of transcribed text.
//!
//! Reproduces the transcript as synthetic keystrokes in whichever window
//! currently has input focus. Optionally mirrors the text to the
//! clipboard first so a failed injection never loses the transcript.

use crate::{AppError, AppResult};

use std::panic::Location;

use arboard::Clipboard;
use enigo::{Enigo, Keyboard, Settings};
use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Delivers transcribed text to the focused input target.
pub trait TextInjector: Send {
    /// Synthesize `text` into the focused target. Empty text is a no-op.
    ///
    /// Failures are reported once and never retried; the transcript is
    /// not re-delivered.
    fn inject(&mut self, text: &str) -> AppResult<()>;
}

/// Types text into the focused window via synthetic keystrokes.
pub struct KeystrokeInjector {
    /// Long-lived clipboard handle when mirroring is enabled. On X11 the
    /// clipboard contents die with the handle, so it must outlive the
    /// injection call.
    clipboard: Option<Clipboard>,
}

impl KeystrokeInjector {
    /// Create an injector; `copy_to_clipboard` also mirrors every
    /// transcript to the system clipboard.
    #[track_caller]
    #[instrument]
    pub fn new(copy_to_clipboard: bool) -> AppResult<Self> {
        let clipboard = if copy_to_clipboard {
            Some(Clipboard::new().map_err(|e| AppError::ClipboardError {
                reason: format!("Failed to initialize clipboard: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?)
        } else {
            None
        };

        info!(copy_to_clipboard, "KeystrokeInjector initialized");

        Ok(Self { clipboard })
    }
}

impl TextInjector for KeystrokeInjector {
    #[track_caller]
    #[instrument(skip(self, text))]
    fn inject(&mut self, text: &str) -> AppResult<()> {
        if text.is_empty() {
            debug!("Empty transcript, nothing to inject");
            return Ok(());
        }

        if let Some(clipboard) = self.clipboard.as_mut() {
            // Best-effort mirror; a clipboard failure alone is not fatal.
            match clipboard.set_text(text) {
                Ok(()) => debug!(text_len = text.len(), "Transcript copied to clipboard"),
                Err(e) => warn!(error = %e, "Clipboard copy failed"),
            }
        }

        // A fresh Enigo per call: construction is cheap and the handle
        // carries platform state that should not outlive one injection.
        let mut enigo = Enigo::new(&Settings::default()).map_err(|e| AppError::InjectionFailed {
            reason: format!("Failed to create keystroke synthesizer: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        enigo.text(text).map_err(|e| AppError::InjectionFailed {
            reason: format!("Failed to type transcript: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(text_len = text.len(), "Transcript injected");

        Ok(())
    }
}
