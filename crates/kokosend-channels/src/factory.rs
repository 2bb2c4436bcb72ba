//! Adapter construction over HTTP.

use crate::bot::{BotChannel, DEFAULT_API_BASE};
use crate::error::ChannelError;
use crate::traits::{AdapterFactory, DestinationAdapter};
use crate::webhook::WebhookChannel;
use crate::Result;
use kokosend_core::config::DestinationsConfig;
use kokosend_core::Credentials;

/// Builds the real webhook and bot adapters, sharing one HTTP client.
#[derive(Debug, Clone)]
pub struct HttpAdapterFactory {
    client: reqwest::Client,
    bot_api_base: String,
}

impl Default for HttpAdapterFactory {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl HttpAdapterFactory {
    /// Create a factory using the given client.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            bot_api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Create a factory honouring the configured bot API base.
    pub fn from_config(client: reqwest::Client, config: &DestinationsConfig) -> Self {
        match &config.bot.api_base {
            Some(base) => Self::new(client).with_bot_api_base(base.clone()),
            None => Self::new(client),
        }
    }

    /// Point bot adapters at another API base URL.
    pub fn with_bot_api_base(mut self, base: impl Into<String>) -> Self {
        self.bot_api_base = base.into();
        self
    }
}

impl AdapterFactory for HttpAdapterFactory {
    fn create(&self, credentials: &Credentials) -> Result<Box<dyn DestinationAdapter>> {
        let missing = credentials.missing_fields();
        if !missing.is_empty() {
            return Err(ChannelError::missing_credential(
                credentials.destination(),
                missing,
            ));
        }

        let adapter: Box<dyn DestinationAdapter> = match credentials {
            Credentials::Webhook(creds) => {
                Box::new(WebhookChannel::new(self.client.clone(), creds.clone()))
            }
            Credentials::Bot(creds) => Box::new(BotChannel::with_api_base(
                self.client.clone(),
                creds.clone(),
                self.bot_api_base.clone(),
            )),
        };
        Ok(adapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kokosend_core::{BotCredentials, Destination, SecretString, WebhookCredentials};

    #[test]
    fn test_creates_adapter_per_destination() {
        let factory = HttpAdapterFactory::default();

        let webhook = factory
            .create(&Credentials::Webhook(WebhookCredentials {
                url: SecretString::new("https://hooks.example/1"),
            }))
            .unwrap();
        assert_eq!(webhook.destination(), Destination::Webhook);
        assert_eq!(webhook.char_limit(), 2000);
        assert!(webhook.supports_embeds());

        let bot = factory
            .create(&Credentials::Bot(BotCredentials {
                token: SecretString::new("1:a"),
                chat_id: "5".to_string(),
            }))
            .unwrap();
        assert_eq!(bot.destination(), Destination::Bot);
        assert_eq!(bot.char_limit(), 4096);
        assert!(!bot.supports_embeds());
    }

    #[test]
    fn test_refuses_incomplete_credentials() {
        let factory = HttpAdapterFactory::default();
        let err = factory
            .create(&Credentials::Bot(BotCredentials::default()))
            .unwrap_err();
        assert!(matches!(err, ChannelError::MissingCredential { destination: Destination::Bot, .. }));
    }
}
