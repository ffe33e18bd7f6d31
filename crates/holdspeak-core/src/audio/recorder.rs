use crate::{
    CoreResult,
    audio::{CaptureBuffer, Resampler, WHISPER_SAMPLE_RATE},
};

use tracing::{debug, info, instrument};

/// Live audio input the dictation orchestrator records from.
///
/// `start()` arms capture, clearing anything left from a prior session;
/// `stop()` seals the recording and returns the snapshot as 16kHz mono
/// samples, leaving the source empty. `stop()` without a prior `start()`
/// returns an empty snapshot.
pub trait AudioSource {
    /// Begin capturing from the input device.
    fn start(&mut self) -> CoreResult<()>;

    /// Stop capturing and return the accumulated snapshot.
    fn stop(&mut self) -> CoreResult<Vec<f32>>;
}

/// Default-device recorder producing Whisper-rate snapshots.
///
/// Composes a [`CaptureBuffer`] with a resampler so every snapshot
/// leaves at 16kHz regardless of the device's native rate. Holds the
/// CPAL stream, so it must stay on the thread that starts it.
pub struct Recorder {
    buffer: CaptureBuffer,
    resampler: Option<Resampler>,
}

impl Recorder {
    /// Open the default input device.
    ///
    /// # Errors
    ///
    /// Returns an error if no input device is available; callers treat
    /// this as a fatal startup condition.
    #[track_caller]
    #[instrument]
    pub fn new() -> CoreResult<Self> {
        let buffer = CaptureBuffer::new()?;

        info!("Recorder initialized");

        Ok(Self {
            buffer,
            resampler: None,
        })
    }
}

impl AudioSource for Recorder {
    #[instrument(skip(self))]
    fn start(&mut self) -> CoreResult<()> {
        let device_rate = self.buffer.sample_rate();

        if device_rate != WHISPER_SAMPLE_RATE {
            self.resampler = Some(Resampler::new(device_rate, WHISPER_SAMPLE_RATE)?);
            debug!(
                input_rate = device_rate,
                output_rate = WHISPER_SAMPLE_RATE,
                "Resampler configured"
            );
        } else {
            self.resampler = None;
        }

        self.buffer.start()
    }

    #[instrument(skip(self))]
    fn stop(&mut self) -> CoreResult<Vec<f32>> {
        let raw = self.buffer.stop()?;

        if raw.is_empty() {
            return Ok(raw);
        }

        match self.resampler.as_mut() {
            Some(resampler) => resampler.resample(&raw),
            None => Ok(raw),
        }
    }
}
