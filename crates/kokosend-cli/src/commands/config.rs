//! Configuration management commands.

use crate::Context;
use clap::Args;
use kokosend_core::config::Config;
use serde_json::Value;

/// Keys whose values are credentials.
const SECRET_KEYS: &[&str] = &["url", "token", "webhook_url", "bot_token"];

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with credentials hidden
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (dot-separated path)
        key: String,

        /// Value to set
        value: String,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration
    Validate,
}

/// Replace non-empty credential values with a placeholder.
pub fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                let secret = SECRET_KEYS.contains(&key.as_str())
                    && v.as_str().is_some_and(|s| !s.is_empty());
                if secret {
                    *v = Value::String("[REDACTED]".to_string());
                } else {
                    redact(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

/// Set a dot-separated key on a config, returning the updated config.
pub fn set_key(config: &Config, key: &str, value: &str) -> anyhow::Result<Config> {
    let mut json = serde_json::to_value(config)?;

    // Walk the dot-separated key path, creating intermediate objects as needed
    let parts: Vec<&str> = key.split('.').collect();
    let mut current = &mut json;
    for (i, part) in parts.iter().enumerate() {
        if i == parts.len() - 1 {
            // String fields take the raw input, so numeric chat IDs stay text.
            // Elsewhere numbers and booleans parse as JSON.
            let parsed = match current.get(part) {
                Some(Value::String(_)) => Value::String(value.to_string()),
                _ => serde_json::from_str(value)
                    .unwrap_or_else(|_| Value::String(value.to_string())),
            };
            current[part] = parsed;
        } else {
            if !current.get(part).is_some_and(|v| v.is_object()) {
                current[part] = serde_json::json!({});
            }
            current = &mut current[part];
        }
    }

    serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid configuration after set: {}", e))
}

/// Run the config command.
pub async fn run(ctx: &Context, args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = ctx.load_config()?;
            let mut json = serde_json::to_value(&config)?;
            redact(&mut json);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }

        ConfigCommand::Set { key, value } => {
            let config = ctx.load_stored_config()?;
            let updated = set_key(&config, &key, &value)?;
            updated.save(ctx.config_path())?;

            let shown = if SECRET_KEYS.iter().any(|k| key.ends_with(k)) {
                "[REDACTED]"
            } else {
                value.as_str()
            };
            println!("Set {} = {}", key, shown);
        }

        ConfigCommand::Init { force } => {
            let path = ctx.config_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {:?}. Use --force to overwrite.",
                    path
                );
            }

            Config::default().save(path)?;
            println!("Created config file: {:?}", path);
        }

        ConfigCommand::Path => {
            println!("{}", ctx.config_path().display());
        }

        ConfigCommand::Validate => match ctx.load_config() {
            Ok(config) => match config.validate() {
                Ok(()) => println!("Configuration is valid"),
                Err(e) => anyhow::bail!("Configuration error: {}", e),
            },
            Err(e) => anyhow::bail!("Failed to load config: {}", e),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kokosend_core::config::ConfigBuilder;

    #[test]
    fn test_set_nested_values() {
        let config = Config::default();
        let updated = set_key(&config, "history.max_entries", "20").unwrap();
        assert_eq!(updated.history.max_entries, 20);

        let updated = set_key(&updated, "destinations.bot.enabled", "false").unwrap();
        assert!(!updated.destinations.bot.enabled);

        let updated = set_key(&updated, "destinations.bot.chat_id", "-100").unwrap();
        assert_eq!(updated.destinations.bot.chat_id, "-100");
    }

    #[test]
    fn test_set_numeric_chat_id_stays_text() {
        let updated = set_key(
            &Config::default(),
            "destinations.bot.chat_id",
            "-1001234567890",
        )
        .unwrap();
        assert_eq!(updated.destinations.bot.chat_id, "-1001234567890");

        let updated = set_key(&updated, "destinations.bot.token", "true").unwrap();
        assert_eq!(updated.destinations.bot.token.expose_secret(), "true");
    }

    #[test]
    fn test_set_rejects_wrong_shape() {
        let err = set_key(&Config::default(), "history.max_entries", "lots").unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_redact_hides_credentials() {
        let config = ConfigBuilder::new()
            .webhook_url("https://hooks.example/secret")
            .bot("123:abc", "-100")
            .build();
        let mut json = serde_json::to_value(&config).unwrap();
        redact(&mut json);

        let text = json.to_string();
        assert!(!text.contains("hooks.example"));
        assert!(!text.contains("123:abc"));
        assert!(text.contains("-100"));
        assert_eq!(json["destinations"]["bot"]["token"], "[REDACTED]");
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kokosend.json5");
        let ctx = Context::new(Some(path.clone())).unwrap();

        let init = |force| ConfigArgs {
            command: ConfigCommand::Init { force },
        };
        run(&ctx, init(false)).await.unwrap();
        assert!(path.exists());
        assert!(run(&ctx, init(false)).await.is_err());
        run(&ctx, init(true)).await.unwrap();
    }
}
