use crate::{
    AudioError,
    audio::engine::{MIN_VIABLE_SAMPLES, below_viable_duration},
    audio::{SpeechEngine, SpeechModel},
};

use std::path::PathBuf;

/// WHAT: SpeechEngine rejects non-existent model path
/// WHY: Early validation prevents runtime failures
#[test]
fn given_invalid_model_path_when_creating_engine_then_model_not_found_error() {
    // Given: Path to non-existent Whisper model
    let invalid_path = PathBuf::from("/nonexistent/model.bin");

    // When: Attempting to create SpeechEngine
    let result = SpeechEngine::new(&invalid_path, false, "en");

    // Then: Returns ModelNotFound error
    assert!(matches!(result, Err(AudioError::ModelNotFound { .. })));
}

/// WHAT: Empty and sub-200ms input is classified below viable duration
/// WHY: A quick tap must become empty-text success, never reach the model
#[test]
fn given_short_input_when_checking_viability_then_below_threshold() {
    // Given/When/Then: empty, one-short-of-threshold, and at-threshold inputs
    assert!(below_viable_duration(&[]));
    assert!(below_viable_duration(&vec![0.0f32; MIN_VIABLE_SAMPLES - 1]));
    assert!(!below_viable_duration(&vec![0.0f32; MIN_VIABLE_SAMPLES]));
}

/// WHAT: Viability threshold corresponds to 200ms of 16kHz audio
/// WHY: The discard window must match the documented minimum utterance
#[test]
fn given_threshold_constant_when_converted_to_millis_then_200ms() {
    let threshold_ms = MIN_VIABLE_SAMPLES * 1000 / crate::WHISPER_SAMPLE_RATE as usize;
    assert_eq!(threshold_ms, 200);
}

/// WHAT: Transcribing a sub-viable recording returns empty text
/// WHY: A tap is a silent no-op, not an error, even against a real model
#[test]
#[allow(clippy::unwrap_used)]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn given_tap_length_samples_when_transcribing_then_empty_success() {
    // Given: SpeechEngine with a real model
    let model_path = std::env::var("TEST_WHISPER_MODEL_PATH")
        .unwrap_or_else(|_| "models/ggml-base.en.bin".to_string());
    let mut engine = SpeechEngine::new(&model_path, false, "en").unwrap();
    let tap = vec![0.0f32; MIN_VIABLE_SAMPLES / 2];

    // When: Transcribing the tap
    let result = engine.transcribe(&tap).unwrap();

    // Then: Empty-text success
    assert!(result.is_empty());
}
