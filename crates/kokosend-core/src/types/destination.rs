//! Destination identifiers and their credentials.

use crate::secret::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A messaging backend a message can be delivered to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// Single-URL webhook accepting multipart submissions.
    Webhook,

    /// Chat backend driven through a bot API.
    Bot,
}

impl Destination {
    /// Every destination, in display order.
    pub const ALL: [Destination; 2] = [Destination::Webhook, Destination::Bot];

    /// Stable lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Webhook => "webhook",
            Self::Bot => "bot",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Webhook => "Webhook channel",
            Self::Bot => "Bot channel",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Destination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "webhook" | "discord" => Ok(Self::Webhook),
            "bot" | "telegram" => Ok(Self::Bot),
            other => Err(format!(
                "unknown destination '{}', expected 'webhook' or 'bot'",
                other
            )),
        }
    }
}

/// Credentials for the webhook destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookCredentials {
    /// Full webhook URL; the URL itself is the secret.
    pub url: SecretString,
}

/// Credentials for the bot destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotCredentials {
    /// Bot API token.
    pub token: SecretString,

    /// Target chat identifier.
    pub chat_id: String,
}

/// Destination-specific credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Webhook(WebhookCredentials),
    Bot(BotCredentials),
}

impl Credentials {
    /// The destination these credentials belong to.
    pub fn destination(&self) -> Destination {
        match self {
            Self::Webhook(_) => Destination::Webhook,
            Self::Bot(_) => Destination::Bot,
        }
    }

    /// Names of required fields that are missing or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match self {
            Self::Webhook(creds) => {
                if creds.url.is_blank() {
                    missing.push("url");
                }
            }
            Self::Bot(creds) => {
                if creds.token.is_blank() {
                    missing.push("token");
                }
                if creds.chat_id.trim().is_empty() {
                    missing.push("chat_id");
                }
            }
        }
        missing
    }

    /// Whether every required field is present.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Read-only snapshot of one destination for a single send.
///
/// Taken from configuration when the send starts; later configuration
/// changes do not reach a send that is already running.
#[derive(Debug, Clone)]
pub struct Target {
    /// Whether the user selected this destination.
    pub enabled: bool,

    /// Credentials captured at send start.
    pub credentials: Credentials,
}

impl Target {
    /// Create a target.
    pub fn new(enabled: bool, credentials: Credentials) -> Self {
        Self {
            enabled,
            credentials,
        }
    }

    /// The destination this target addresses.
    pub fn destination(&self) -> Destination {
        self.credentials.destination()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_parse_and_display() {
        assert_eq!("webhook".parse::<Destination>().unwrap(), Destination::Webhook);
        assert_eq!(" Telegram ".parse::<Destination>().unwrap(), Destination::Bot);
        assert!("slack".parse::<Destination>().is_err());
        assert_eq!(Destination::Bot.to_string(), "bot");
    }

    #[test]
    fn test_destination_serde() {
        let json = serde_json::to_string(&Destination::Webhook).unwrap();
        assert_eq!(json, "\"webhook\"");
    }

    #[test]
    fn test_bot_credentials_completeness() {
        let creds = Credentials::Bot(BotCredentials {
            token: SecretString::new("123:abc"),
            chat_id: "  ".to_string(),
        });
        assert!(!creds.is_complete());
        assert_eq!(creds.missing_fields(), vec!["chat_id"]);

        let creds = Credentials::Bot(BotCredentials {
            token: SecretString::new("123:abc"),
            chat_id: "-100123".to_string(),
        });
        assert!(creds.is_complete());
    }

    #[test]
    fn test_webhook_credentials_completeness() {
        let creds = Credentials::Webhook(WebhookCredentials::default());
        assert_eq!(creds.missing_fields(), vec!["url"]);
        assert_eq!(creds.destination(), Destination::Webhook);
    }
}
