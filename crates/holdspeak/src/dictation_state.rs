use crate::Session;

/// Internal orchestration state.
///
/// `Listening` always carries the active session; during `Transcribing`
/// the session is sealed and its samples belong to the worker, so only
/// the identity is kept here for matching the completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictationState {
    /// Nothing recording, nothing in flight.
    Idle,
    /// The chord is held and the capture buffer is armed.
    Listening {
        /// The active recording session.
        session: Session,
    },
    /// A sealed recording is with the transcription worker.
    Transcribing {
        /// The sealed session awaiting its transcript.
        session: Session,
    },
}
