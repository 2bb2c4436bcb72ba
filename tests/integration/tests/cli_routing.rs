//! CLI routing integration tests.
//!
//! These tests parse real argument lists and run them in-process against a
//! temporary config file and mock servers.

use clap::Parser;
use kokosend_cli::{run, Cli, Context};
use kokosend_core::config::Config;
use kokosend_core::HistoryStore;
use kokosend_integration_tests::{webhook_url, WEBHOOK_PATH};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn kokosend(config: &Path, args: &[&str]) -> anyhow::Result<()> {
    let config = config.to_string_lossy().to_string();
    let mut argv = vec!["kokosend", "--config", config.as_str()];
    argv.extend_from_slice(args);

    let cli = Cli::try_parse_from(argv)?;
    let ctx = Context::new(cli.config.clone())?;
    run(cli, ctx).await
}

fn config_path(dir: &TempDir) -> PathBuf {
    dir.path().join("kokosend.json5")
}

#[tokio::test]
async fn test_version() {
    let dir = TempDir::new().unwrap();
    kokosend(&config_path(&dir), &["version"]).await.unwrap();
}

#[tokio::test]
async fn test_init_set_and_validate() {
    let dir = TempDir::new().unwrap();
    let path = config_path(&dir);

    kokosend(&path, &["config", "init"]).await.unwrap();
    assert!(path.exists());

    // both destinations enabled without credentials
    assert!(kokosend(&path, &["config", "validate"]).await.is_err());

    kokosend(&path, &["config", "set", "destinations.bot.enabled", "false"])
        .await
        .unwrap();
    kokosend(
        &path,
        &["config", "set", "destinations.webhook.url", "https://hooks.example/1"],
    )
    .await
    .unwrap();
    kokosend(&path, &["config", "validate"]).await.unwrap();

    let config = Config::load(&path).unwrap();
    assert!(!config.destinations.bot.enabled);
}

#[tokio::test]
async fn test_unknown_preset_fails() {
    let dir = TempDir::new().unwrap();
    let result = kokosend(&config_path(&dir), &["presets", "apply", "nope"]).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_send_records_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .and(body_string_contains("from the cli"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let path = config_path(&dir);
    let history = dir.path().join("history.json");
    std::fs::write(
        &path,
        format!(
            r#"{{
                destinations: {{
                    webhook: {{ url: "{}" }},
                    bot: {{ enabled: false }},
                }},
                history: {{ file: "{}" }},
            }}"#,
            webhook_url(&server),
            history.display()
        ),
    )
    .unwrap();

    kokosend(&path, &["send", "-m", "from the cli", "--no-retry"])
        .await
        .unwrap();

    let entries = HistoryStore::open(&history, 50).list();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "from the cli");

    kokosend(&path, &["history", "list", "--limit", "1"]).await.unwrap();
    kokosend(&path, &["history", "clear"]).await.unwrap();
    assert!(HistoryStore::open(&history, 50).list().is_empty());
}

#[tokio::test]
async fn test_send_without_content_fails() {
    let dir = TempDir::new().unwrap();
    let result = kokosend(&config_path(&dir), &["send", "--no-retry"]).await;
    assert!(result.is_err());
}
