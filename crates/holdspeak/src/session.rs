use std::time::Instant;

use uuid::Uuid;

/// One press-to-release recording cycle.
///
/// Created on engage, sealed on disengage; the id correlates every log
/// line and the worker completion belonging to this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// Unique session ID for log correlation.
    pub id: Uuid,
    /// When the chord engaged and capture began.
    pub started_at: Instant,
}

impl Session {
    /// Open a new session stamped with the current instant.
    pub fn begin() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Instant::now(),
        }
    }
}
