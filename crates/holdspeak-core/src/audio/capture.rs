use crate::{AudioError, CoreResult};

use std::{
    collections::VecDeque,
    panic::Location,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};

/// Maximum samples to buffer (5 minutes at 48kHz mono).
/// Prevents unbounded memory growth if the chord is held indefinitely.
///
/// **Memory footprint at max capacity:**
/// - 48,000 Hz * 60s * 5 min * 4 bytes/f32 = ~58MB
/// - This is a hard upper bound; typical utterances are a few seconds
pub(crate) const MAX_BUFFER_SAMPLES: usize = 48_000 * 60 * 5;

/// Sample store shared between the audio callback and the buffer owner.
///
/// Single-writer discipline: the callback appends, the owner reads only
/// via `drain()` after the stream has been stopped.
#[derive(Debug)]
pub(crate) struct SampleStore {
    samples: Mutex<VecDeque<f32>>,
}

impl SampleStore {
    pub(crate) fn new() -> Self {
        Self {
            samples: Mutex::new(VecDeque::with_capacity(MAX_BUFFER_SAMPLES)),
        }
    }

    /// Drop anything buffered from a previous session.
    pub(crate) fn clear(&self) {
        self.lock().clear();
    }

    /// Append one callback frame, evicting the oldest samples past the cap.
    pub(crate) fn append(&self, data: &[f32]) {
        let mut buf = self.lock();
        buf.extend(data.iter().copied());
        // Ring buffer: O(1) amortized drop of oldest samples via VecDeque
        while buf.len() > MAX_BUFFER_SAMPLES {
            buf.pop_front();
        }
    }

    /// Take the accumulated snapshot, leaving the store empty.
    ///
    /// Calling this when nothing was ever appended returns an empty
    /// snapshot; a spurious stop must not fail.
    pub(crate) fn drain(&self) -> Vec<f32> {
        self.lock().drain(..).collect()
    }

    // Recover from lock poison rather than silently dropping audio.
    // A poisoned mutex means a previous holder panicked, but the
    // VecDeque data is still valid and usable.
    fn lock(&self) -> MutexGuard<'_, VecDeque<f32>> {
        self.samples.lock().unwrap_or_else(|e| {
            error!("Sample store lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}

/// Accumulates microphone samples between `start()` and `stop()`.
///
/// Owns no threads of its own: CPAL delivers frames on its callback
/// context, and the owner drains the snapshot after stopping.
pub struct CaptureBuffer {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    store: Arc<SampleStore>,
    /// Signals the audio callback to stop writing. Set to `true` before
    /// dropping the stream so no in-flight callback writes after the
    /// snapshot is drained in `stop()`.
    shutdown: Arc<AtomicBool>,
    /// Device fault reported by the stream error callback, surfaced on
    /// the next `stop()` as a capture failure.
    fault: Arc<Mutex<Option<String>>>,
}

impl CaptureBuffer {
    /// Open the default input device.
    #[track_caller]
    #[instrument]
    pub fn new() -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or(AudioError::NoMicrophoneFound {
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config = device
            .default_input_config()
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to get config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "CaptureBuffer initialized"
        );

        Ok(Self {
            device,
            config: config.into(),
            stream: None,
            store: Arc::new(SampleStore::new()),
            shutdown: Arc::new(AtomicBool::new(false)),
            fault: Arc::new(Mutex::new(None)),
        })
    }

    /// Begin appending incoming frames, clearing any prior contents.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<()> {
        let store = Arc::clone(&self.store);
        let shutdown = Arc::clone(&self.shutdown);
        let fault = Arc::clone(&self.fault);

        // Reset per-session state before the stream goes live
        self.shutdown.store(false, Ordering::Release);
        store.clear();
        take_fault(&self.fault);

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Check shutdown flag before touching the store. Once
                    // stop() sets this flag, no new samples are written
                    // even if CPAL fires one more callback before the
                    // stream is dropped.
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    store.append(data);
                },
                move |err| {
                    error!("Audio stream error: {}", err);
                    *fault.lock().unwrap_or_else(|e| e.into_inner()) = Some(err.to_string());
                },
                None,
            )
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to build stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| AudioError::DeviceError {
            reason: format!("Failed to start stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);
        info!("Audio capture started");

        Ok(())
    }

    /// Halt appending and return the accumulated snapshot, leaving the
    /// buffer empty.
    ///
    /// Without a prior `start()` this returns an empty snapshot: a
    /// disengage that never engaged is a no-operation, not an error.
    /// A device fault reported mid-session surfaces here instead.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> CoreResult<Vec<f32>> {
        // Signal the callback to stop writing BEFORE dropping the stream,
        // so the final in-flight callback observes the flag even if the
        // backend's drop() returns before it completes.
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Brief yield so any in-flight callback observes the shutdown
            // flag. On most CPAL backends drop() joins the audio thread
            // and this is redundant, but it costs <5ms.
            std::thread::sleep(std::time::Duration::from_millis(5));
            info!("Audio capture stopped");
        }

        if let Some(reason) = take_fault(&self.fault) {
            self.store.clear();
            return Err(AudioError::DeviceError {
                reason,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let samples = self.store.drain();
        debug!(sample_count = samples.len(), "Captured audio samples");

        Ok(samples)
    }

    /// Native sample rate of the input device.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }
}

fn take_fault(fault: &Arc<Mutex<Option<String>>>) -> Option<String> {
    fault
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .take()
}
