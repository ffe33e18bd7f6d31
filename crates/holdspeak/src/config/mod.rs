mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
pub(crate) mod hotkey_config;
mod whisper_config;

pub(crate) use {
    behaviour_config::BehaviourConfig, config::Config, hotkey_config::HotkeyConfig,
    whisper_config::WhisperConfig,
};

pub(crate) const DEFAULT_MIN_UTTERANCE_MS: u64 = 150;
pub(crate) const DEFAULT_COPY_TO_CLIPBOARD: bool = false;

pub(crate) fn default_min_utterance_ms() -> u64 {
    DEFAULT_MIN_UTTERANCE_MS
}

pub(crate) fn default_copy_to_clipboard() -> bool {
    DEFAULT_COPY_TO_CLIPBOARD
}
