use crate::{AudioError, CoreResult, audio::WHISPER_SAMPLE_RATE};

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Recordings shorter than this many samples (200ms at 16kHz) are
/// treated as accidental taps: transcribed to empty text without
/// invoking the model.
pub(crate) const MIN_VIABLE_SAMPLES: usize = WHISPER_SAMPLE_RATE as usize / 5;

/// True when a snapshot is too short for the model to produce anything
/// but hallucinated noise.
pub(crate) fn below_viable_duration(samples: &[f32]) -> bool {
    samples.len() < MIN_VIABLE_SAMPLES
}

/// Capability to turn a sealed recording into text.
///
/// The orchestrator depends only on this seam; the model's loading,
/// quantization, and language settings stay with the implementation.
pub trait SpeechModel: Send + 'static {
    /// Transcribe 16kHz mono samples into text.
    ///
    /// Input below the minimum viable duration (including empty input)
    /// must produce empty-text success, not an error.
    fn transcribe(&mut self, samples: &[f32]) -> CoreResult<String>;
}

/// Local Whisper speech-to-text engine.
pub struct SpeechEngine {
    ctx: WhisperContext,
    language: String,
}

impl SpeechEngine {
    /// Load a Whisper model from disk.
    #[track_caller]
    #[instrument(skip(model_path))]
    pub fn new<P: AsRef<Path>>(model_path: P, use_gpu: bool, language: &str) -> CoreResult<Self> {
        let path = model_path.as_ref();

        if !path.exists() {
            return Err(AudioError::ModelNotFound {
                path: path.to_path_buf(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut ctx_params = WhisperContextParameters::default();
        ctx_params.use_gpu(use_gpu);

        let ctx = WhisperContext::new_with_params(
            path.to_str().ok_or(AudioError::ModelNotFound {
                path: path.to_path_buf(),
                location: ErrorLocation::from(Location::caller()),
            })?,
            ctx_params,
        )
        .map_err(|e| AudioError::TranscriptionFailed {
            source: Box::new(e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(model_path = ?path, use_gpu = use_gpu, "Whisper model loaded");

        Ok(Self {
            ctx,
            language: language.to_string(),
        })
    }
}

impl SpeechModel for SpeechEngine {
    #[track_caller]
    #[instrument(skip(self, samples))]
    fn transcribe(&mut self, samples: &[f32]) -> CoreResult<String> {
        if below_viable_duration(samples) {
            debug!(
                sample_count = samples.len(),
                "Recording below viable duration, returning empty transcript"
            );
            return Ok(String::new());
        }

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

        params.set_language(Some(&self.language));
        params.set_print_progress(false);
        params.set_print_special(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_suppress_blank(true);
        params.set_suppress_nst(true);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| AudioError::TranscriptionFailed {
                source: Box::new(e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        state
            .full(params, samples)
            .map_err(|e| AudioError::TranscriptionFailed {
                source: Box::new(e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let num_segments = state.full_n_segments();

        // Pre-allocate: ~256 bytes per segment covers typical English
        // speech with a single allocation.
        let mut result = String::with_capacity(num_segments as usize * 256);

        for i in 0..num_segments {
            let segment = state
                .get_segment(i)
                .ok_or_else(|| AudioError::TranscriptionFailed {
                    source: format!("Failed to get segment {}", i).into(),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            result.push_str(&segment.to_string());
            result.push(' ');
        }

        let transcription = result.trim().to_string();

        debug!(
            sample_count = samples.len(),
            segment_count = num_segments,
            text_len = transcription.len(),
            "Transcription complete"
        );

        Ok(transcription)
    }
}
