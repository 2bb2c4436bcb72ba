//! Bot API destination.
//!
//! Delivery is a strict sequence of calls against `{api_base}/bot{token}/{method}`:
//! the inline text, then the overflow file, then images and videos in media
//! groups of up to ten, then every other attachment one by one. The first
//! failing call ends the delivery.

use crate::attachment::{Attachment, AttachmentType};
use crate::error::ChannelError;
use crate::message::Message;
use crate::splitter;
use crate::traits::DestinationAdapter;
use crate::Result;
use async_trait::async_trait;
use kokosend_core::{BotCredentials, Destination, SecretString};
use reqwest::multipart::Form;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

/// Maximum characters in one bot text message.
pub const BOT_CHAR_LIMIT: usize = 4096;

/// Maximum items in one media group.
pub const MEDIA_GROUP_MAX: usize = 10;

/// Public bot API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

const SEND_DOCUMENT: &str = "sendDocument";

/// Bot API destination adapter.
pub struct BotChannel {
    client: reqwest::Client,
    token: SecretString,
    chat_id: String,
    api_base: String,
}

impl std::fmt::Debug for BotChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotChannel")
            .field("token", &self.token)
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct InputMedia {
    #[serde(rename = "type")]
    kind: &'static str,
    media: String,
}

/// Upload method and file field for an attachment type.
pub fn upload_method(kind: AttachmentType) -> (&'static str, &'static str) {
    match kind {
        AttachmentType::Image => ("sendPhoto", "photo"),
        AttachmentType::Audio => ("sendAudio", "audio"),
        AttachmentType::Video => ("sendVideo", "video"),
        AttachmentType::Document => (SEND_DOCUMENT, "document"),
    }
}

impl BotChannel {
    /// Create an adapter for the public bot API.
    pub fn new(client: reqwest::Client, credentials: BotCredentials) -> Self {
        Self::with_api_base(client, credentials, DEFAULT_API_BASE)
    }

    /// Create an adapter against a different API base URL.
    pub fn with_api_base(
        client: reqwest::Client,
        credentials: BotCredentials,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token: credentials.token,
            chat_id: credentials.chat_id,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token.expose_secret(), method)
    }

    async fn send_message(&self, text: &str) -> Result<()> {
        debug!("sendMessage ({} chars)", text.chars().count());

        let response = self
            .client
            .get(self.endpoint("sendMessage"))
            .query(&[
                ("chat_id", self.chat_id.as_str()),
                ("text", text),
                ("parse_mode", "Markdown"),
            ])
            .send()
            .await
            .map_err(http_error)?;

        ensure_success("sendMessage", response.status())
    }

    async fn upload(&self, method: &str, field: &str, attachment: &Attachment) -> Result<StatusCode> {
        debug!("{} {}", method, attachment.filename);

        let form = Form::new()
            .text("chat_id", self.chat_id.clone())
            .part(field.to_string(), attachment.to_part()?);

        let response = self
            .client
            .post(self.endpoint(method))
            .multipart(form)
            .send()
            .await
            .map_err(http_error)?;

        Ok(response.status())
    }

    /// Send one file with its type-specific method, falling back to a
    /// document upload once if that is rejected.
    async fn send_file(&self, attachment: &Attachment) -> Result<()> {
        let (method, field) = upload_method(attachment.attachment_type);
        let status = self.upload(method, field, attachment).await?;
        if status.is_success() {
            return Ok(());
        }

        if method == SEND_DOCUMENT {
            return Err(ChannelError::transport(method, status.as_u16()));
        }

        warn!(
            "{} rejected {} (HTTP {}), retrying as document",
            method, attachment.filename, status
        );

        let fallback_status = self.upload(SEND_DOCUMENT, "document", attachment).await?;
        if fallback_status.is_success() {
            return Ok(());
        }

        Err(ChannelError::FallbackExhausted {
            method: method.to_string(),
            status: status.as_u16(),
            fallback_status: fallback_status.as_u16(),
        })
    }

    async fn send_media_group(&self, batch: &[&Attachment]) -> Result<()> {
        debug!("sendMediaGroup ({} items)", batch.len());

        let media: Vec<InputMedia> = batch
            .iter()
            .enumerate()
            .map(|(i, attachment)| InputMedia {
                kind: match attachment.attachment_type {
                    AttachmentType::Video => "video",
                    _ => "photo",
                },
                media: format!("attach://file{}", i),
            })
            .collect();

        let mut form = Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("media", serde_json::to_string(&media)?);

        for (i, attachment) in batch.iter().enumerate() {
            form = form.part(format!("file{}", i), attachment.to_part()?);
        }

        let response = self
            .client
            .post(self.endpoint("sendMediaGroup"))
            .multipart(form)
            .send()
            .await
            .map_err(http_error)?;

        ensure_success("sendMediaGroup", response.status())
    }
}

fn http_error(e: reqwest::Error) -> ChannelError {
    // The request URL embeds the bot token.
    ChannelError::Http(e.without_url())
}

fn ensure_success(method: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        warn!("{} failed: HTTP {}", method, status);
        Err(ChannelError::transport(method, status.as_u16()))
    }
}

#[async_trait]
impl DestinationAdapter for BotChannel {
    fn destination(&self) -> Destination {
        Destination::Bot
    }

    fn char_limit(&self) -> usize {
        BOT_CHAR_LIMIT
    }

    async fn deliver(&self, message: &Message) -> Result<()> {
        let split = splitter::split(&message.text, BOT_CHAR_LIMIT);

        if !split.inline.is_empty() {
            self.send_message(&split.inline).await?;
        }

        if let Some(overflow) = &split.overflow {
            self.send_file(overflow).await?;
        }

        let (groupable, individual): (Vec<&Attachment>, Vec<&Attachment>) =
            message.attachments.iter().partition(|a| a.is_groupable());

        for batch in groupable.chunks(MEDIA_GROUP_MAX) {
            match batch {
                [single] => self.send_file(single).await?,
                _ => self.send_media_group(batch).await?,
            }
        }

        for attachment in individual {
            self.send_file(attachment).await?;
        }

        Ok(())
    }
}
