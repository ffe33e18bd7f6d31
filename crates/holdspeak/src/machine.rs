//! Dictation state machine.
//!
//! The orchestrator for the capture/transcribe/inject pipeline. It owns
//! the audio source and reacts to events from one single-consumer
//! channel: an engage edge arms capture, a disengage edge seals the
//! recording and hands it to a background transcription worker, and the
//! worker's completion routes the transcript to the injector. Every
//! transition and status notification happens on this task, so the sink
//! observes one strictly ordered sequence per session and at most one
//! recording or in-flight transcription exists at any instant.
//!
//! An engage arriving while a transcription is still in flight is
//! dropped (and logged), not queued: recording with a transcript still
//! pending would give the operator no cue which utterance lands first.

use crate::{
    AppError, AppResult, DictationPhase, DictationState, MachineEvent, Session, StatusSink,
    TextInjector,
};

use std::{panic::Location, sync::Arc, time::Instant};

use error_location::ErrorLocation;
use holdspeak_core::{AudioError, AudioSource, SpeechModel, WHISPER_SAMPLE_RATE};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Duration of a 16kHz snapshot in milliseconds.
pub(crate) fn snapshot_duration_ms(samples: &[f32]) -> u64 {
    samples.len() as u64 * 1000 / u64::from(WHISPER_SAMPLE_RATE)
}

/// Push-to-talk orchestrator.
///
/// Generic over its four seams so tests can substitute mocks: the audio
/// source, the speech model, the text injector, and the status sink.
pub struct DictationMachine<A, M, I, S> {
    audio: A,
    model: Arc<Mutex<M>>,
    injector: I,
    sink: S,
    state: DictationState,
    /// Recordings shorter than this are discarded without transcription.
    min_utterance_ms: u64,
    /// Clone handed to transcription workers for completion delivery.
    event_tx: mpsc::Sender<MachineEvent>,
    /// Signals collaborators (the tray menu loop) when the machine stops.
    shutdown_tx: watch::Sender<bool>,
    /// Set when shutdown was requested while a transcription is in
    /// flight; the machine exits once that transcript lands.
    shutdown_pending: bool,
}

impl<A, M, I, S> DictationMachine<A, M, I, S>
where
    A: AudioSource,
    M: SpeechModel,
    I: TextInjector,
    S: StatusSink,
{
    /// Create a machine in the Idle state.
    pub fn new(
        audio: A,
        model: M,
        injector: I,
        sink: S,
        min_utterance_ms: u64,
        event_tx: mpsc::Sender<MachineEvent>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Self {
        Self {
            audio,
            model: Arc::new(Mutex::new(model)),
            injector,
            sink,
            state: DictationState::Idle,
            min_utterance_ms,
            event_tx,
            shutdown_tx,
            shutdown_pending: false,
        }
    }

    /// Current orchestration state.
    #[cfg(test)]
    pub(crate) fn state(&self) -> DictationState {
        self.state
    }

    /// Run the machine until shutdown or a fatal fault.
    #[instrument(skip(self, event_rx))]
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<MachineEvent>) -> AppResult<()> {
        info!(min_utterance_ms = self.min_utterance_ms, "Dictation machine running");

        let result = self.event_loop(&mut event_rx).await;

        // Release collaborators waiting on the machine before reporting.
        let _ = self.shutdown_tx.send(true);
        info!("Dictation machine stopped");

        result
    }

    async fn event_loop(&mut self, event_rx: &mut mpsc::Receiver<MachineEvent>) -> AppResult<()> {
        while let Some(event) = event_rx.recv().await {
            match event {
                MachineEvent::Engage => self.on_engage(),
                MachineEvent::Disengage => self.on_disengage(),
                MachineEvent::TranscriptDone { session_id, result } => {
                    self.on_transcript_done(session_id, result);
                    if self.shutdown_pending && self.state == DictationState::Idle {
                        break;
                    }
                }
                MachineEvent::HotkeyFault { reason } => {
                    error!(reason = %reason, "Input hook lost");
                    return Err(AppError::HotkeyListenFailed {
                        reason,
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                MachineEvent::Shutdown => match self.state {
                    DictationState::Transcribing { session } => {
                        // Exit only after the in-flight transcript lands so
                        // a completed recording is not silently dropped.
                        info!(session_id = %session.id, "Shutdown deferred until transcription completes");
                        self.shutdown_pending = true;
                    }
                    DictationState::Listening { session } => {
                        // The chord is still held at exit: discard rather
                        // than inject into whatever window focus lands on
                        // after teardown.
                        let _ = self.audio.stop();
                        debug!(session_id = %session.id, "Session discarded at shutdown");
                        self.state = DictationState::Idle;
                        self.sink.notify(DictationPhase::Idle);
                        break;
                    }
                    DictationState::Idle => break,
                },
            }
        }

        Ok(())
    }

    /// Idle -> Listening: arm the capture buffer.
    ///
    /// A capture-start failure aborts the session before it begins; the
    /// machine stays Idle and the sink is (re)notified so the indicator
    /// never sticks.
    pub(crate) fn on_engage(&mut self) {
        match self.state {
            DictationState::Idle => {
                let session = Session::begin();

                if let Err(e) = self.audio.start() {
                    error!(session_id = %session.id, error = ?e, "Failed to start capture");
                    self.sink.notify(DictationPhase::Idle);
                    return;
                }

                self.state = DictationState::Listening { session };
                self.sink.notify(DictationPhase::Listening);
                info!(session_id = %session.id, "Listening");
            }
            DictationState::Listening { .. } => {
                // Repeat engage for a chord that never fully released;
                // the tracker suppresses these, but stay defensive.
                debug!("Engage while already listening, ignored");
            }
            DictationState::Transcribing { session } => {
                // Policy: drop, do not queue. See the module docs.
                debug!(in_flight = %session.id, "Engage while transcribing, dropped");
            }
        }
    }

    /// Listening -> Transcribing (or back to Idle on discard/failure):
    /// seal the recording and dispatch the transcription worker.
    pub(crate) fn on_disengage(&mut self) {
        let session = match self.state {
            DictationState::Listening { session } => session,
            _ => {
                // Chord released without a live session (engage failed or
                // never happened). stop() below would be a no-op anyway.
                debug!("Disengage outside listening, ignored");
                return;
            }
        };

        let samples = match self.audio.stop() {
            Ok(s) => s,
            Err(e) => {
                error!(session_id = %session.id, error = ?e, "Capture failed, session aborted");
                self.state = DictationState::Idle;
                self.sink.notify(DictationPhase::Idle);
                return;
            }
        };

        let duration_ms = snapshot_duration_ms(&samples);
        if duration_ms < self.min_utterance_ms {
            debug!(
                session_id = %session.id,
                duration_ms,
                "Recording below minimum utterance, discarded"
            );
            self.state = DictationState::Idle;
            self.sink.notify(DictationPhase::Idle);
            return;
        }

        self.state = DictationState::Transcribing { session };
        self.sink.notify(DictationPhase::Transcribing);
        info!(
            session_id = %session.id,
            duration_ms,
            hold_ms = session.started_at.elapsed().as_millis() as u64,
            sample_count = samples.len(),
            "Transcribing"
        );

        let model = Arc::clone(&self.model);
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            let started = Instant::now();
            let result = model.lock().await.transcribe(&samples);

            if let Ok(text) = &result {
                info!(
                    session_id = %session.id,
                    duration_ms = started.elapsed().as_millis() as u64,
                    text_len = text.len(),
                    "Transcription complete"
                );
            }

            let done = MachineEvent::TranscriptDone {
                session_id: session.id,
                result,
            };
            if event_tx.send(done).await.is_err() {
                warn!(session_id = %session.id, "Machine gone before transcript delivery");
            }
        });
    }

    /// Transcribing -> Idle: inject the transcript (or report the
    /// failure) and release the session.
    pub(crate) fn on_transcript_done(
        &mut self,
        session_id: Uuid,
        result: Result<String, AudioError>,
    ) {
        let session = match self.state {
            DictationState::Transcribing { session } if session.id == session_id => session,
            _ => {
                // A completion for a session this machine no longer owns.
                warn!(session_id = %session_id, "Stale transcript completion, dropped");
                return;
            }
        };

        match result {
            Ok(text) => {
                if let Err(e) = self.injector.inject(&text) {
                    // Reported once, never retried; the transcript is not
                    // re-delivered.
                    warn!(session_id = %session.id, error = ?e, "Injection failed");
                }
            }
            Err(e) => {
                error!(session_id = %session.id, error = ?e, "Transcription failed");
            }
        }

        self.state = DictationState::Idle;
        self.sink.notify(DictationPhase::Idle);
        info!(session_id = %session.id, "Session complete");
    }
}
