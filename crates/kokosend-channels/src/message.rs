//! Outgoing message model.

use crate::attachment::Attachment;
use serde::{Deserialize, Serialize};

/// Rich embed metadata rendered natively by the webhook destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichEmbed {
    /// Embed title.
    pub title: String,

    /// Embed body.
    pub description: String,

    /// Accent colour as `0xRRGGBB`.
    pub accent_color: u32,
}

impl RichEmbed {
    /// Create an embed.
    pub fn new(title: impl Into<String>, description: impl Into<String>, accent_color: u32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            accent_color,
        }
    }

    /// Whether the embed has anything to show.
    pub fn is_populated(&self) -> bool {
        !self.title.trim().is_empty() || !self.description.trim().is_empty()
    }

    /// Plain-text rendering for destinations without native embeds.
    pub fn as_text(&self) -> String {
        match (self.title.trim().is_empty(), self.description.trim().is_empty()) {
            (false, false) => format!("*{}*\n{}", self.title, self.description),
            (false, true) => format!("*{}*", self.title),
            (true, false) => self.description.clone(),
            (true, true) => String::new(),
        }
    }
}

/// An immutable snapshot of what the user wants to send.
#[derive(Debug, Clone, Default)]
pub struct Message {
    /// Message text.
    pub text: String,

    /// Attached files, in the order the user added them.
    pub attachments: Vec<Attachment>,

    /// Optional rich embed.
    pub embed: Option<RichEmbed>,
}

impl Message {
    /// Create a text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Add an attachment.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Add several attachments.
    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = Attachment>) -> Self {
        self.attachments.extend(attachments);
        self
    }

    /// Set the embed.
    pub fn with_embed(mut self, embed: RichEmbed) -> Self {
        self.embed = Some(embed);
        self
    }

    /// The embed, if it has anything to show.
    pub fn populated_embed(&self) -> Option<&RichEmbed> {
        self.embed.as_ref().filter(|e| e.is_populated())
    }

    /// Whether there is anything to send.
    pub fn has_content(&self) -> bool {
        !self.text.is_empty() || !self.attachments.is_empty() || self.populated_embed().is_some()
    }

    /// Fold the embed into the text, for destinations that cannot render it.
    ///
    /// The embed text follows the existing text after a blank line.
    pub fn with_embed_inlined(&self) -> Self {
        let mut message = self.clone();
        if let Some(embed) = message.embed.take().filter(|e| e.is_populated()) {
            let rendered = embed.as_text();
            if message.text.is_empty() {
                message.text = rendered;
            } else {
                message.text = format!("{}\n\n{}", message.text, rendered);
            }
        }
        message
    }
}
