//! Configuration loading and persistence.

use super::{Config, Preset, EMPTY_PRESET};
use crate::env;
use crate::error::ConfigError;
use crate::paths;
use crate::secret::SecretString;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 has no serializer; plain JSON is valid JSON5.
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from an explicit path, or the default path, then apply environment
    /// overrides. A missing file yields defaults; a broken file is an error.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match env::get_var(env::vars::CONFIG) {
                Some(p) => paths::expand_tilde(&p),
                None => paths::config_file()?,
            },
        };

        let mut config = match Self::load(&path) {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => {
                debug!("No config file at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => return Err(e),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `KOKOSEND_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_with(env::get_var);
    }

    /// Apply overrides using an arbitrary variable lookup.
    pub fn apply_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(env::vars::WEBHOOK_URL) {
            self.destinations.webhook.url = SecretString::new(url);
        }
        if let Some(token) = lookup(env::vars::BOT_TOKEN) {
            self.destinations.bot.token = SecretString::new(token);
        }
        if let Some(chat_id) = lookup(env::vars::BOT_CHAT_ID) {
            self.destinations.bot.chat_id = chat_id;
        }
        if lookup(env::vars::NO_HISTORY).is_some_and(|v| env::is_truthy(&v)) {
            self.history.enabled = false;
        }
    }

    /// User presets followed by the built-in `Empty` preset.
    pub fn all_presets(&self) -> Vec<Preset> {
        let mut presets = self.presets.clone();
        if !presets.iter().any(|p| p.name == EMPTY_PRESET) {
            presets.push(Preset::empty());
        }
        presets
    }

    /// Copy a preset's credentials into the destinations section.
    ///
    /// Enabled flags are left as they are.
    pub fn apply_preset(&mut self, name: &str) -> Result<(), ConfigError> {
        let preset = self
            .all_presets()
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?;

        self.destinations.webhook.url = preset.webhook_url;
        self.destinations.bot.token = preset.bot_token;
        self.destinations.bot.chat_id = preset.bot_chat_id;
        debug!("Applied preset {}", preset.name);
        Ok(())
    }

    /// Resolved history file path.
    pub fn history_file(&self) -> Result<PathBuf, ConfigError> {
        match &self.history.file {
            Some(file) => Ok(paths::expand_tilde(&file.to_string_lossy())),
            None => paths::history_file(),
        }
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        // 1. Enabled destinations need complete credentials
        for target in self.destinations.targets() {
            if !target.enabled {
                continue;
            }
            let missing = target.credentials.missing_fields();
            if !missing.is_empty() {
                errors.push(format!(
                    "{} is enabled but missing: {}",
                    target.destination().label(),
                    missing.join(", ")
                ));
            }
        }

        // 2. Webhook URL must be http(s)
        let webhook_url = self.destinations.webhook.url.expose_secret();
        if !webhook_url.trim().is_empty() && !is_http_url(webhook_url) {
            errors.push("Webhook URL must be an http(s) URL".to_string());
        }

        // 3. Bot API base override must be http(s)
        if let Some(base) = &self.destinations.bot.api_base {
            if !is_http_url(base) {
                errors.push(format!("Bot api_base '{}' is not an http(s) URL", base));
            }
        }

        // 4. History limits
        if self.history.max_entries == 0 {
            errors.push("History max_entries must be greater than 0".to_string());
        }

        // 5. Preset names must be present and unique
        let mut seen = HashSet::new();
        for (i, preset) in self.presets.iter().enumerate() {
            if preset.name.trim().is_empty() {
                errors.push(format!("Preset [{}]: name must not be empty", i));
            } else if !seen.insert(preset.name.to_lowercase()) {
                errors.push(format!("Duplicate preset name '{}'", preset.name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}

fn is_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Configuration builder for creating configs programmatically.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new config builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the webhook URL.
    pub fn webhook_url(mut self, url: impl Into<String>) -> Self {
        self.config.destinations.webhook.url = SecretString::new(url);
        self
    }

    /// Set the bot token and chat ID.
    pub fn bot(mut self, token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        self.config.destinations.bot.token = SecretString::new(token);
        self.config.destinations.bot.chat_id = chat_id.into();
        self
    }

    /// Override the bot API base URL.
    pub fn bot_api_base(mut self, base: impl Into<String>) -> Self {
        self.config.destinations.bot.api_base = Some(base.into());
        self
    }

    /// Enable or disable the webhook destination.
    pub fn webhook_enabled(mut self, enabled: bool) -> Self {
        self.config.destinations.webhook.enabled = enabled;
        self
    }

    /// Enable or disable the bot destination.
    pub fn bot_enabled(mut self, enabled: bool) -> Self {
        self.config.destinations.bot.enabled = enabled;
        self
    }

    /// Add a preset.
    pub fn preset(mut self, preset: Preset) -> Self {
        self.config.presets.push(preset);
        self
    }

    /// Set the maximum number of history entries.
    pub fn history_max_entries(mut self, max: usize) -> Self {
        self.config.history.max_entries = max;
        self
    }

    /// Set the history file.
    pub fn history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.history.file = Some(path.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Config {
        self.config
    }
}
