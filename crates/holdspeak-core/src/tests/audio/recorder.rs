use crate::{AudioSource, Recorder};

/// WHAT: Recorder returns an empty snapshot when stopped before starting
/// WHY: The orchestrator calls stop() defensively on spurious disengages
#[test]
#[allow(clippy::unwrap_used)]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn given_recorder_when_stopping_without_start_then_empty_snapshot() {
    // Given: A recorder over the default input device
    let mut recorder = Recorder::new().unwrap();

    // When: Stopping without a prior start
    let snapshot = recorder.stop().unwrap();

    // Then: Snapshot is empty, no error
    assert!(snapshot.is_empty());
}

/// WHAT: A short live capture produces a 16kHz snapshot
/// WHY: Snapshots must leave at the model's rate regardless of device rate
#[test]
#[allow(clippy::unwrap_used)]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn given_recorder_when_capturing_briefly_then_snapshot_at_whisper_rate() {
    // Given: A started recorder
    let mut recorder = Recorder::new().unwrap();
    recorder.start().unwrap();

    // When: Capturing for half a second
    std::thread::sleep(std::time::Duration::from_millis(500));
    let snapshot = recorder.stop().unwrap();

    // Then: Roughly half a second of 16kHz samples (generous tolerance
    // for stream spin-up)
    assert!(snapshot.len() > 16_000 / 4);
    assert!(snapshot.len() < 16_000);
}
