//! Pipeline phase reporting.
//!
//! The state machine drives a passive observer; the tray icon is the
//! production implementation, tests substitute a recording sink.

use crate::TrayCommand;

use tao::event_loop::EventLoopProxy;
use tracing::debug;

/// Externally visible phase of the dictation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictationPhase {
    /// Ready; no session active.
    Idle,
    /// Recording while the chord is held.
    Listening,
    /// A sealed recording is being transcribed.
    Transcribing,
}

/// Observer of phase changes.
///
/// `notify` is fire-and-forget and must return promptly: the machine
/// calls it inline between transitions, and one notification is fully
/// delivered before the next begins.
pub trait StatusSink: Send {
    /// Report that the pipeline entered `phase`.
    fn notify(&self, phase: DictationPhase);
}

/// Status sink backed by the tray icon on the main thread.
pub struct TraySink {
    proxy: EventLoopProxy<TrayCommand>,
}

impl TraySink {
    /// Wrap an event loop proxy for phase updates.
    pub fn new(proxy: EventLoopProxy<TrayCommand>) -> Self {
        Self { proxy }
    }
}

impl StatusSink for TraySink {
    fn notify(&self, phase: DictationPhase) {
        // Fire and forget: a closed event loop means we are shutting down.
        if self.proxy.send_event(TrayCommand::SetState(phase)).is_err() {
            debug!(?phase, "Event loop gone, phase update dropped");
        }
    }
}
