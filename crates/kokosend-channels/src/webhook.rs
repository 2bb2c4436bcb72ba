//! Webhook destination.
//!
//! Everything goes out in one multipart POST to the webhook URL: the inline
//! text (or a JSON payload when an embed is present), the user's files as
//! `files[i]`, and the overflow text file as `overflow_file`.

use crate::attachment::Attachment;
use crate::error::ChannelError;
use crate::message::{Message, RichEmbed};
use crate::splitter;
use crate::traits::DestinationAdapter;
use crate::Result;
use async_trait::async_trait;
use kokosend_core::{Destination, SecretString, WebhookCredentials};
use reqwest::multipart::Form;
use serde::Serialize;
use tracing::{debug, warn};

/// Maximum characters in one webhook message.
pub const WEBHOOK_CHAR_LIMIT: usize = 2000;

/// Multipart field carrying the overflow text file.
pub const OVERFLOW_FIELD: &str = "overflow_file";

/// Webhook destination adapter.
pub struct WebhookChannel {
    client: reqwest::Client,
    url: SecretString,
}

impl std::fmt::Debug for WebhookChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookChannel")
            .field("url", &self.url)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    embeds: Vec<EmbedPayload<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedPayload<'a> {
    title: &'a str,
    description: &'a str,
    color: u32,
}

impl<'a> From<&'a RichEmbed> for EmbedPayload<'a> {
    fn from(embed: &'a RichEmbed) -> Self {
        Self {
            title: &embed.title,
            description: &embed.description,
            color: embed.accent_color,
        }
    }
}

impl WebhookChannel {
    /// Create an adapter posting to the given webhook.
    pub fn new(client: reqwest::Client, credentials: WebhookCredentials) -> Self {
        Self {
            client,
            url: credentials.url,
        }
    }

    fn build_form(
        &self,
        inline: &str,
        embed: Option<&RichEmbed>,
        attachments: &[Attachment],
        overflow: Option<&Attachment>,
    ) -> Result<Form> {
        let mut form = Form::new();

        match embed {
            Some(embed) => {
                let payload = WebhookPayload {
                    content: (!inline.is_empty()).then_some(inline),
                    embeds: vec![embed.into()],
                };
                form = form.text("payload_json", serde_json::to_string(&payload)?);
            }
            None if !inline.is_empty() => {
                form = form.text("content", inline.to_string());
            }
            None => {}
        }

        for (i, attachment) in attachments.iter().enumerate() {
            form = form.part(format!("files[{}]", i), attachment.to_part()?);
        }

        if let Some(overflow) = overflow {
            form = form.part(OVERFLOW_FIELD, overflow.to_part()?);
        }

        Ok(form)
    }
}

#[async_trait]
impl DestinationAdapter for WebhookChannel {
    fn destination(&self) -> Destination {
        Destination::Webhook
    }

    fn char_limit(&self) -> usize {
        WEBHOOK_CHAR_LIMIT
    }

    fn supports_embeds(&self) -> bool {
        true
    }

    async fn deliver(&self, message: &Message) -> Result<()> {
        let split = splitter::split(&message.text, WEBHOOK_CHAR_LIMIT);
        let embed = message.populated_embed();

        if split.inline.is_empty() && message.attachments.is_empty() && embed.is_none() {
            debug!("Nothing to post to webhook");
            return Ok(());
        }

        let form = self.build_form(
            &split.inline,
            embed,
            &message.attachments,
            split.overflow.as_ref(),
        )?;

        debug!(
            "Posting to webhook: {} files, overflow={}, embed={}",
            message.attachments.len(),
            split.overflow.is_some(),
            embed.is_some()
        );

        let response = self
            .client
            .post(self.url.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ChannelError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Webhook rejected message: HTTP {}", status);
            return Err(ChannelError::transport("webhook", status.as_u16()));
        }

        Ok(())
    }
}
