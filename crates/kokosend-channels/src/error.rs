//! Channel error types.

use crate::delivery::DeliveryOutcome;
use kokosend_core::Destination;
use std::io;
use thiserror::Error;

/// Errors that can occur while delivering to a destination.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// HTTP request error (connection, TLS, body encoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required credential field is empty.
    #[error("{} is missing credentials: {}", .destination.label(), .fields.join(", "))]
    MissingCredential {
        /// Destination whose credentials are incomplete.
        destination: Destination,
        /// Names of the missing fields.
        fields: Vec<&'static str>,
    },

    /// The remote end answered with a non-success status.
    #[error("{method} failed with HTTP {status}")]
    Transport {
        /// Logical call that failed.
        method: String,
        /// HTTP status code.
        status: u16,
    },

    /// A type-specific upload and its document fallback both failed.
    #[error("{method} failed with HTTP {status}, sendDocument fallback failed with HTTP {fallback_status}")]
    FallbackExhausted {
        /// Type-specific method tried first.
        method: String,
        /// Status of the type-specific call.
        status: u16,
        /// Status of the fallback call.
        fallback_status: u16,
    },

    /// Attachment error.
    #[error("Attachment error: {0}")]
    Attachment(String),

    /// A status change the tracker does not allow.
    #[error("{destination}: cannot move from {from} to {to}")]
    InvalidTransition {
        /// Destination being updated.
        destination: Destination,
        /// Current outcome.
        from: &'static str,
        /// Requested outcome.
        to: &'static str,
    },

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChannelError {
    /// Create a transport error.
    pub fn transport(method: impl Into<String>, status: u16) -> Self {
        Self::Transport {
            method: method.into(),
            status,
        }
    }

    /// Create a missing credential error.
    pub fn missing_credential(destination: Destination, fields: Vec<&'static str>) -> Self {
        Self::MissingCredential {
            destination,
            fields,
        }
    }

    /// Create an invalid transition error.
    pub fn invalid_transition(
        destination: Destination,
        from: &DeliveryOutcome,
        to: &DeliveryOutcome,
    ) -> Self {
        Self::InvalidTransition {
            destination,
            from: from.name(),
            to: to.name(),
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            Self::FallbackExhausted {
                fallback_status, ..
            } => Some(*fallback_status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
