use holdspeak_core::AudioError;
use uuid::Uuid;

/// Events consumed by the dictation state machine.
///
/// Hotkey edges, worker completions, and control requests all land on a
/// single-consumer channel so the machine observes them in one total
/// order; nothing else mutates dictation state.
#[derive(Debug)]
pub enum MachineEvent {
    /// The hotkey chord became fully held.
    Engage,
    /// The hotkey chord stopped being fully held.
    Disengage,
    /// Background transcription finished for a session.
    TranscriptDone {
        /// Session the worker was transcribing.
        session_id: Uuid,
        /// Transcript text, or the model failure.
        result: Result<String, AudioError>,
    },
    /// The OS input hook could not be established or died.
    HotkeyFault {
        /// Human-readable reason from the input layer.
        reason: String,
    },
    /// Request application shutdown.
    Shutdown,
}
