use crate::config::{BehaviourConfig, HotkeyConfig, WhisperConfig, hotkey_config::parse_key};

use std::collections::HashSet;

use rdev::Key;

/// WHAT: The default chord resolves to right Alt
/// WHY: Out of the box the app must dictate on the documented hold key
#[test]
#[allow(clippy::unwrap_used)]
fn given_default_hotkey_config_when_resolving_then_altgr_only() {
    // Given: The default configuration
    let config = HotkeyConfig::default();

    // When: Resolving the chord
    let keys = config.resolve().unwrap();

    // Then: Exactly right Alt
    assert_eq!(keys, HashSet::from([Key::AltGr]));
}

/// WHAT: A multi-key chord resolves every member
/// WHY: Chord membership drives the tracker's set test
#[test]
#[allow(clippy::unwrap_used)]
fn given_multi_key_chord_when_resolving_then_all_members_present() {
    // Given: A Ctrl+Space chord in config
    let config = HotkeyConfig {
        chord: vec!["Ctrl".to_string(), "Space".to_string()],
    };

    // When: Resolving
    let keys = config.resolve().unwrap();

    // Then: Both members resolved
    assert_eq!(keys, HashSet::from([Key::ControlLeft, Key::Space]));
}

/// WHAT: Unknown key names are configuration errors
/// WHY: A chord that can never be satisfied would leave the app silently inert
#[test]
fn given_unknown_key_name_when_resolving_then_config_error() {
    let config = HotkeyConfig {
        chord: vec!["HyperTurbo".to_string()],
    };
    assert!(config.resolve().is_err());
}

/// WHAT: An empty chord is a configuration error
/// WHY: Same failure mode as unknown keys: nothing could ever engage
#[test]
fn given_empty_chord_when_resolving_then_config_error() {
    let config = HotkeyConfig { chord: vec![] };
    assert!(config.resolve().is_err());
}

/// WHAT: Key names parse case-insensitively
/// WHY: Hand-edited TOML should not fail on capitalization
#[test]
fn given_mixed_case_names_when_parsing_then_same_key() {
    assert_eq!(parse_key("AltRight"), Some(Key::AltGr));
    assert_eq!(parse_key("ALTRIGHT"), Some(Key::AltGr));
    assert_eq!(parse_key("altright"), Some(Key::AltGr));
    assert_eq!(parse_key("F4"), Some(Key::F4));
    assert_eq!(parse_key("definitely-not-a-key"), None);
}

/// WHAT: Missing behaviour fields fall back to documented defaults
/// WHY: Hand-edited configs omit sections; defaults must match the docs
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_behaviour_table_when_deserializing_then_defaults_apply() {
    // Given/When: An empty TOML table
    let config: BehaviourConfig = toml::from_str("").unwrap();

    // Then: 150ms discard threshold, clipboard mirroring off
    assert_eq!(config.min_utterance_ms, 150);
    assert!(!config.copy_to_clipboard);
}

/// WHAT: Whisper config defaults language and GPU use
/// WHY: Only the model path is mandatory
#[test]
#[allow(clippy::unwrap_used)]
fn given_model_path_only_when_deserializing_then_whisper_defaults_apply() {
    let config: WhisperConfig = toml::from_str("model_path = '/models/ggml-base.en.bin'").unwrap();

    assert_eq!(config.language, "en");
    assert!(config.use_gpu);
}

/// WHAT: Hotkey section omitted entirely still yields the default chord
/// WHY: The chord must survive round trips through minimal configs
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_hotkey_table_when_deserializing_then_default_chord() {
    let config: HotkeyConfig = toml::from_str("").unwrap();
    assert_eq!(config.chord, vec!["AltRight".to_string()]);
}
