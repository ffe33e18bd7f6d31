pub(crate) mod capture;
pub(crate) mod engine;
mod recorder;
mod resampler;

pub(crate) use {capture::CaptureBuffer, resampler::Resampler};

pub use {
    engine::{SpeechEngine, SpeechModel},
    recorder::{AudioSource, Recorder},
};

/// Sample rate Whisper models consume. Every snapshot a [`Recorder`]
/// produces is mono at this rate.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;
