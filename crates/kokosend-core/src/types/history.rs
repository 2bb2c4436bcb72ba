//! History entry types.

use super::Destination;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How completely a recorded send was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    /// Every enabled destination succeeded.
    Success,

    /// Some enabled destinations succeeded.
    Partial,
}

/// A record of a send that reached at least one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique entry ID.
    pub id: String,

    /// Message text as composed by the user.
    pub text: String,

    /// Destinations that actually accepted the message.
    pub destinations: Vec<Destination>,

    /// When the outcome was recorded.
    pub timestamp: DateTime<Utc>,

    /// Delivery completeness.
    pub status: HistoryStatus,
}

impl HistoryEntry {
    /// Create a new entry stamped with the current time.
    pub fn new(
        text: impl Into<String>,
        destinations: Vec<Destination>,
        status: HistoryStatus,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            destinations,
            timestamp: Utc::now(),
            status,
        }
    }
}
