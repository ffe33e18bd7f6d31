use crate::{AppError, AppResult};

use std::{collections::HashSet, panic::Location};

use error_location::ErrorLocation;
use rdev::Key;
use serde::{Deserialize, Serialize};

/// Hotkey chord configuration.
///
/// Every named key must be held simultaneously to dictate; order does
/// not matter. The chord is resolved once at startup and immutable for
/// the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Key names that must all be held to dictate (e.g. ["AltRight"]).
    #[serde(default = "default_chord")]
    pub chord: Vec<String>,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            chord: default_chord(),
        }
    }
}

fn default_chord() -> Vec<String> {
    vec!["AltRight".to_string()]
}

impl HotkeyConfig {
    /// Resolve the configured names into the key set the chord tracker
    /// evaluates.
    ///
    /// Unknown names and empty chords are configuration errors: a chord
    /// that can never be satisfied would leave the app silently inert.
    #[track_caller]
    pub fn resolve(&self) -> AppResult<HashSet<Key>> {
        if self.chord.is_empty() {
            return Err(AppError::ConfigError {
                reason: "Hotkey chord is empty; at least one key is required".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut keys = HashSet::with_capacity(self.chord.len());
        for name in &self.chord {
            let key = parse_key(name).ok_or_else(|| AppError::ConfigError {
                reason: format!("Unknown key name in hotkey chord: {}", name),
                location: ErrorLocation::from(Location::caller()),
            })?;
            keys.insert(key);
        }

        Ok(keys)
    }
}

/// Parse a configured key name into an rdev key. Case-insensitive.
pub(crate) fn parse_key(name: &str) -> Option<Key> {
    match name.to_ascii_lowercase().as_str() {
        "alt" | "altleft" => Some(Key::Alt),
        "altright" | "altgr" => Some(Key::AltGr),
        "ctrl" | "controlleft" => Some(Key::ControlLeft),
        "controlright" => Some(Key::ControlRight),
        "shift" | "shiftleft" => Some(Key::ShiftLeft),
        "shiftright" => Some(Key::ShiftRight),
        "super" | "meta" | "metaleft" => Some(Key::MetaLeft),
        "metaright" => Some(Key::MetaRight),
        "space" => Some(Key::Space),
        "capslock" => Some(Key::CapsLock),
        "tab" => Some(Key::Tab),
        "escape" => Some(Key::Escape),
        "insert" => Some(Key::Insert),
        "home" => Some(Key::Home),
        "end" => Some(Key::End),
        "pageup" => Some(Key::PageUp),
        "pagedown" => Some(Key::PageDown),
        "scrolllock" => Some(Key::ScrollLock),
        "pause" => Some(Key::Pause),
        "f1" => Some(Key::F1),
        "f2" => Some(Key::F2),
        "f3" => Some(Key::F3),
        "f4" => Some(Key::F4),
        "f5" => Some(Key::F5),
        "f6" => Some(Key::F6),
        "f7" => Some(Key::F7),
        "f8" => Some(Key::F8),
        "f9" => Some(Key::F9),
        "f10" => Some(Key::F10),
        "f11" => Some(Key::F11),
        "f12" => Some(Key::F12),
        _ => None,
    }
}
