use crate::{KeystrokeInjector, TextInjector};

/// WHAT: Injecting empty text is a no-op that touches nothing
/// WHY: A discarded or silent recording must not wake the OS input layer
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_transcript_when_injecting_then_no_op_success() {
    // Given: An injector without clipboard mirroring (safe headless)
    let mut injector = KeystrokeInjector::new(false).unwrap();

    // When: Injecting the empty transcript
    let result = injector.inject("");

    // Then: Success without any keystroke synthesis
    assert!(result.is_ok());
}

/// WHAT: Non-empty injection attempts keystroke synthesis
/// WHY: Smoke test for the platform input path; needs a display server
#[test]
#[allow(clippy::unwrap_used)]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn given_text_when_injecting_then_synthesis_succeeds() {
    let mut injector = KeystrokeInjector::new(false).unwrap();
    injector.inject("hello from holdspeak").unwrap();
}
