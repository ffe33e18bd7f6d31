//! Holdspeak Core Library
//!
//! Microphone capture and local speech-to-text using CPAL, Rubato, and Whisper.
//!
//! # Example
//!
//! ```no_run
//! use holdspeak_core::{AudioSource, CoreResult, Recorder, SpeechEngine, SpeechModel};
//!
//! use std::{thread::sleep, time::Duration};
//!
//! fn main() -> CoreResult<()> {
//!     let mut recorder = Recorder::new()?;
//!     let mut engine = SpeechEngine::new("models/ggml-base.en.bin", true, "en")?;
//!
//!     recorder.start()?;
//!     sleep(Duration::from_secs(3));
//!     let samples = recorder.stop()?;
//!
//!     println!("Transcribed: {}", engine.transcribe(&samples)?);
//!     Ok(())
//! }
//! ```

mod audio;
mod error;

pub use {
    audio::{AudioSource, Recorder, SpeechEngine, SpeechModel, WHISPER_SAMPLE_RATE},
    error::AudioError,
    error::Result as CoreResult,
};

#[cfg(test)]
mod tests;
