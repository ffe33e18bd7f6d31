use crate::audio::capture::{MAX_BUFFER_SAMPLES, SampleStore};

use std::sync::Arc;

/// WHAT: Draining a store that never received samples yields an empty snapshot
/// WHY: A disengage without a prior engage must be a harmless no-operation
#[test]
fn given_unused_store_when_draining_then_empty_snapshot() {
    // Given: A freshly created store with no appends
    let store = SampleStore::new();

    // When: Draining without anything ever captured
    let snapshot = store.drain();

    // Then: Snapshot is empty, no panic
    assert!(snapshot.is_empty());
}

/// WHAT: Draining empties the store
/// WHY: A snapshot belongs to exactly one session; the next session starts clean
#[test]
fn given_filled_store_when_draining_then_store_left_empty() {
    // Given: A store holding one session's samples
    let store = SampleStore::new();
    store.append(&[0.25f32; 480]);

    // When: Draining the snapshot
    let snapshot = store.drain();

    // Then: Snapshot holds the samples and a second drain is empty
    assert_eq!(snapshot.len(), 480);
    assert!(store.drain().is_empty());
}

/// WHAT: Clearing discards samples left from a previous session
/// WHY: `start()` must not leak audio from an earlier recording
#[test]
fn given_stale_samples_when_clearing_then_next_snapshot_excludes_them() {
    // Given: A store with leftovers from a prior session
    let store = SampleStore::new();
    store.append(&[0.9f32; 100]);

    // When: Clearing, then appending the new session's samples
    store.clear();
    store.append(&[0.1f32; 50]);

    // Then: Only the new session's samples remain
    let snapshot = store.drain();
    assert_eq!(snapshot.len(), 50);
    assert!(snapshot.iter().all(|&s| (s - 0.1).abs() < f32::EPSILON));
}

/// WHAT: Store respects MAX_BUFFER_SAMPLES limit
/// WHY: Prevents unbounded memory growth if the chord is held indefinitely
#[test]
fn given_store_at_max_capacity_when_appending_then_oldest_discarded() {
    // Given: A store filled to capacity with 0.0
    let store = SampleStore::new();
    store.append(&vec![0.0f32; MAX_BUFFER_SAMPLES]);

    // When: Appending 1024 new samples (value 1.0) beyond the limit
    store.append(&[1.0f32; 1024]);

    // Then: Store stays at MAX_BUFFER_SAMPLES and newest samples survive
    let snapshot = store.drain();
    assert_eq!(snapshot.len(), MAX_BUFFER_SAMPLES);
    assert!((snapshot[MAX_BUFFER_SAMPLES - 1] - 1.0).abs() < f32::EPSILON);
    assert!((snapshot[MAX_BUFFER_SAMPLES - 1024] - 1.0).abs() < f32::EPSILON);
}

/// WHAT: Concurrent appends produce a consistent store
/// WHY: Validates thread safety under audio-callback contention
#[test]
#[allow(clippy::unwrap_used)]
fn given_concurrent_writers_when_appending_then_no_corruption() {
    // Given: A shared store simulating callback contention
    let store = Arc::new(SampleStore::new());
    let mut handles = vec![];

    // When: 4 threads append 1000 batches of 48 samples each concurrently
    for i in 0..4u8 {
        let store_clone = Arc::clone(&store);
        handles.push(std::thread::spawn(move || {
            let batch = [f32::from(i); 48];
            for _ in 0..1000 {
                store_clone.append(&batch);
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    // Then: All samples arrived and every value is finite
    let snapshot = store.drain();
    assert_eq!(snapshot.len(), 4 * 1000 * 48);
    assert!(snapshot.iter().all(|s| s.is_finite()));
}

/// WHAT: Real capture buffer returns an empty snapshot when stopped unarmed
/// WHY: A spurious disengage against the live device must not fail
#[test]
#[allow(clippy::unwrap_used)]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn given_device_buffer_when_stopping_without_start_then_empty_snapshot() {
    // Given: A capture buffer over the default input device
    let mut buffer = crate::audio::CaptureBuffer::new().unwrap();

    // When: Stopping without a prior start
    let snapshot = buffer.stop().unwrap();

    // Then: Snapshot is empty
    assert!(snapshot.is_empty());
}
