//! Configuration schema definitions.

use crate::secret::SecretString;
use crate::types::{BotCredentials, Credentials, Target, WebhookCredentials};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the built-in preset that clears every credential.
pub const EMPTY_PRESET: &str = "Empty";

/// Main KokoSend configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Destination selection and credentials.
    #[serde(default)]
    pub destinations: DestinationsConfig,

    /// Named credential bundles.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presets: Vec<Preset>,

    /// History log settings.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Destinations configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DestinationsConfig {
    /// Webhook destination.
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Bot destination.
    #[serde(default)]
    pub bot: BotConfig,
}

impl DestinationsConfig {
    /// Snapshot every destination as a send target.
    pub fn targets(&self) -> Vec<Target> {
        vec![
            Target::new(self.webhook.enabled, self.webhook.credentials()),
            Target::new(self.bot.enabled, self.bot.credentials()),
        ]
    }
}

/// Webhook destination configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Whether sends go to this destination by default.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Webhook URL.
    #[serde(default)]
    pub url: SecretString,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: SecretString::default(),
        }
    }
}

impl WebhookConfig {
    /// Credentials view of this section.
    pub fn credentials(&self) -> Credentials {
        Credentials::Webhook(WebhookCredentials {
            url: self.url.clone(),
        })
    }
}

/// Bot destination configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Whether sends go to this destination by default.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Bot API token.
    #[serde(default)]
    pub token: SecretString,

    /// Target chat ID.
    #[serde(default)]
    pub chat_id: String,

    /// Bot API base URL override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            token: SecretString::default(),
            chat_id: String::new(),
            api_base: None,
        }
    }
}

impl BotConfig {
    /// Credentials view of this section.
    pub fn credentials(&self) -> Credentials {
        Credentials::Bot(BotCredentials {
            token: self.token.clone(),
            chat_id: self.chat_id.clone(),
        })
    }
}

/// A named set of destination credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Preset name.
    pub name: String,

    /// Webhook URL.
    #[serde(default)]
    pub webhook_url: SecretString,

    /// Bot API token.
    #[serde(default)]
    pub bot_token: SecretString,

    /// Bot chat ID.
    #[serde(default)]
    pub bot_chat_id: String,
}

impl Preset {
    /// The built-in preset that clears all credentials.
    pub fn empty() -> Self {
        Self {
            name: EMPTY_PRESET.to_string(),
            ..Default::default()
        }
    }
}

/// History log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Whether successful sends are recorded.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of entries kept, newest first.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// History file path (defaults to ~/.kokosend/history.json).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_max_entries(),
            file: None,
        }
    }
}

fn default_max_entries() -> usize {
    50
}

fn default_true() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}
