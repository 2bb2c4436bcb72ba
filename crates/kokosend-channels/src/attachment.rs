//! Attachment handling for messages.

use crate::error::ChannelError;
use crate::Result;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A file attached to a message.
///
/// Contents are held in memory as [`Bytes`], so handing the same attachment
/// to several destinations only bumps a reference count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Attachment type.
    pub attachment_type: AttachmentType,

    /// File name.
    pub filename: String,

    /// MIME type.
    pub mime_type: String,

    /// File contents.
    pub data: Bytes,

    /// File size in bytes.
    pub size: usize,
}

/// Type of attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentType {
    /// Image (png, jpg, gif, webp).
    Image,

    /// Audio file.
    Audio,

    /// Video file.
    Video,

    /// Document/file.
    Document,
}

impl Attachment {
    /// Create an attachment from bytes.
    pub fn from_bytes(
        bytes: impl Into<Bytes>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        let data = bytes.into();
        let mime_type = mime_type.into();

        Self {
            attachment_type: Self::detect_type(&mime_type),
            filename: filename.into(),
            size: data.len(),
            mime_type,
            data,
        }
    }

    /// Read an attachment from a file path, guessing the MIME type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| ChannelError::Attachment(format!("{}: {}", path.display(), e)))?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string());

        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();

        debug!("Loaded attachment {} ({}, {} bytes)", filename, mime_type, data.len());
        Ok(Self::from_bytes(data, filename, mime_type))
    }

    /// Detect attachment type from MIME type.
    pub fn detect_type(mime_type: &str) -> AttachmentType {
        if mime_type.starts_with("image/") {
            AttachmentType::Image
        } else if mime_type.starts_with("audio/") {
            AttachmentType::Audio
        } else if mime_type.starts_with("video/") {
            AttachmentType::Video
        } else {
            AttachmentType::Document
        }
    }

    /// Whether this attachment can travel inside a bot media group.
    pub fn is_groupable(&self) -> bool {
        matches!(
            self.attachment_type,
            AttachmentType::Image | AttachmentType::Video
        )
    }

    /// Build a multipart part carrying this file.
    pub(crate) fn to_part(&self) -> Result<reqwest::multipart::Part> {
        reqwest::multipart::Part::stream_with_length(self.data.clone(), self.data.len() as u64)
            .file_name(self.filename.clone())
            .mime_str(&self.mime_type)
            .map_err(ChannelError::from)
    }
}
