//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be written to disk and loaded
//! back, and that presets and history settings survive the trip.

use kokosend_core::config::{Config, ConfigBuilder, Preset};
use kokosend_core::{HistoryStore, SecretString};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kokosend.json5");

    let config = ConfigBuilder::new()
        .webhook_url("https://hooks.example/1")
        .bot("123:abc", "-100")
        .history_max_entries(7)
        .preset(Preset {
            name: "weekend".to_string(),
            webhook_url: SecretString::new("https://hooks.example/weekend"),
            ..Default::default()
        })
        .build();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(
        loaded.destinations.webhook.url.expose_secret(),
        "https://hooks.example/1"
    );
    assert_eq!(loaded.destinations.bot.chat_id, "-100");
    assert_eq!(loaded.history.max_entries, 7);
    assert_eq!(loaded.presets, config.presets);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/kokosend.json5"));
    assert!(result.is_err());
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json5 {");
    assert!(result.is_err());
}

#[test]
fn test_history_follows_config() {
    let dir = TempDir::new().unwrap();
    let history_path = dir.path().join("log").join("sent.json");

    let config = ConfigBuilder::new()
        .history_file(&history_path)
        .history_max_entries(2)
        .build();
    let store = HistoryStore::from_config(&config).unwrap();

    assert_eq!(store.path(), history_path.as_path());
    assert_eq!(store.max_entries(), 2);
}

#[test]
fn test_apply_preset_then_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kokosend.json5");

    let mut config = ConfigBuilder::new()
        .bot("123:abc", "-100")
        .build();
    config.apply_preset("Empty").unwrap();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert!(loaded.destinations.bot.token.is_blank());
    assert!(loaded.validate().is_err());
}
