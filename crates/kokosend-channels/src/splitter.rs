//! Splitting of text that exceeds a destination's character limit.
//!
//! Text over the limit is replaced inline by a short notice, and the full
//! text travels as a plain-text file instead.

use crate::attachment::Attachment;

/// File name of the overflow attachment.
pub const OVERFLOW_FILENAME: &str = "full_message.txt";

/// Result of splitting text against a limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// Text to send inline; at most `limit` characters.
    pub inline: String,

    /// Full text as a file, present when the text was over the limit.
    pub overflow: Option<Attachment>,
}

/// Notice sent inline in place of over-long text.
pub fn overflow_notice(limit: usize) -> String {
    format!("⚠️ Message exceeded {} characters. Full text attached.", limit)
}

/// Split `text` for a destination accepting at most `limit` characters.
///
/// Lengths are counted in Unicode scalar values.
pub fn split(text: &str, limit: usize) -> Split {
    if text.chars().count() <= limit {
        return Split {
            inline: text.to_string(),
            overflow: None,
        };
    }

    let notice = overflow_notice(limit);
    let inline = if notice.chars().count() > limit {
        notice.chars().take(limit).collect()
    } else {
        notice
    };

    let overflow = Attachment::from_bytes(
        text.as_bytes().to_vec(),
        OVERFLOW_FILENAME,
        "text/plain",
    );

    Split {
        inline,
        overflow: Some(overflow),
    }
}
