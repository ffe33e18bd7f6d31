use crate::config::{default_copy_to_clipboard, default_min_utterance_ms};

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Recordings shorter than this are discarded as accidental taps.
    #[serde(default = "default_min_utterance_ms")]
    pub min_utterance_ms: u64,

    /// Also copy every transcript to the system clipboard.
    #[serde(default = "default_copy_to_clipboard")]
    pub copy_to_clipboard: bool,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            min_utterance_ms: default_min_utterance_ms(),
            copy_to_clipboard: default_copy_to_clipboard(),
        }
    }
}
