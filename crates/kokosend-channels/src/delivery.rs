//! Per-destination delivery status tracking.
//!
//! Allowed transitions:
//!
//! ```text
//! Pending -> Success
//! Pending -> Error
//! Error   -> Pending   (retry)
//! ```
//!
//! `Skipped` is set only when a send starts and never changes until the next one.

use crate::error::ChannelError;
use crate::Result;
use kokosend_core::{Destination, Target};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::watch;
use tracing::debug;

/// Delivery state of one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DeliveryOutcome {
    /// Delivery is in flight.
    Pending,

    /// Every call for this destination succeeded.
    Success,

    /// Delivery failed; the destination can be retried.
    Error {
        /// Human-readable failure.
        reason: String,
    },

    /// The destination was not selected for this send.
    Skipped,
}

impl DeliveryOutcome {
    /// Create an error outcome.
    pub fn error(reason: impl Into<String>) -> Self {
        Self::Error {
            reason: reason.into(),
        }
    }

    /// Short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Error { .. } => "error",
            Self::Skipped => "skipped",
        }
    }

    /// Check if this is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    fn can_become(&self, next: &DeliveryOutcome) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Success)
                | (Self::Pending, Self::Error { .. })
                | (Self::Error { .. }, Self::Pending)
        )
    }
}

impl std::fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error { reason } => write!(f, "error: {}", reason),
            other => f.write_str(other.name()),
        }
    }
}

/// Overall result of a send across all enabled destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate {
    /// Every enabled destination succeeded.
    FullSuccess,

    /// Some enabled destinations succeeded.
    PartialSuccess,

    /// Every enabled destination failed.
    FullFailure,
}

/// Outcome map keyed by destination.
pub type StatusMap = BTreeMap<Destination, DeliveryOutcome>;

/// Result of a send or retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    /// Outcome of every destination.
    pub outcomes: StatusMap,

    /// Aggregate result; `None` when nothing was attempted.
    pub aggregate: Option<Aggregate>,
}

impl SendResult {
    /// Result of a send that did nothing.
    pub fn noop() -> Self {
        Self {
            outcomes: StatusMap::new(),
            aggregate: None,
        }
    }

    /// Build a result from settled outcomes.
    pub fn from_outcomes(outcomes: StatusMap) -> Self {
        let aggregate = aggregate(&outcomes);
        Self {
            outcomes,
            aggregate,
        }
    }

    /// Whether the send was a no-op.
    pub fn is_noop(&self) -> bool {
        self.aggregate.is_none()
    }

    /// Destinations that succeeded.
    pub fn succeeded(&self) -> Vec<Destination> {
        self.filter(|o| matches!(o, DeliveryOutcome::Success))
    }

    /// Destinations that failed.
    pub fn failed(&self) -> Vec<Destination> {
        self.filter(DeliveryOutcome::is_error)
    }

    /// Outcome of one destination.
    pub fn outcome(&self, destination: Destination) -> Option<&DeliveryOutcome> {
        self.outcomes.get(&destination)
    }

    fn filter(&self, pred: impl Fn(&DeliveryOutcome) -> bool) -> Vec<Destination> {
        self.outcomes
            .iter()
            .filter(|(_, o)| pred(o))
            .map(|(d, _)| *d)
            .collect()
    }
}

/// Aggregate the outcomes of the enabled (non-skipped) destinations.
pub fn aggregate(outcomes: &StatusMap) -> Option<Aggregate> {
    let enabled: Vec<&DeliveryOutcome> = outcomes
        .values()
        .filter(|o| !matches!(o, DeliveryOutcome::Skipped))
        .collect();

    if enabled.is_empty() {
        return None;
    }

    if enabled.iter().all(|o| matches!(o, DeliveryOutcome::Success)) {
        Some(Aggregate::FullSuccess)
    } else if enabled.iter().all(|o| o.is_error()) {
        Some(Aggregate::FullFailure)
    } else {
        Some(Aggregate::PartialSuccess)
    }
}

/// Observable per-destination status.
///
/// Updates are published on a watch channel; having no subscribers is fine.
#[derive(Debug)]
pub struct StatusTracker {
    tx: watch::Sender<StatusMap>,
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StatusMap::new());
        Self { tx }
    }

    /// Start a new send: enabled targets become pending, the rest skipped.
    pub fn reset(&self, targets: &[Target]) {
        let map = targets
            .iter()
            .map(|t| {
                let outcome = if t.enabled {
                    DeliveryOutcome::Pending
                } else {
                    DeliveryOutcome::Skipped
                };
                (t.destination(), outcome)
            })
            .collect();
        self.tx.send_replace(map);
    }

    /// Move a destination to a new outcome.
    pub fn transition(&self, destination: Destination, next: DeliveryOutcome) -> Result<()> {
        let mut result = Ok(());
        self.tx.send_if_modified(|map| match map.get(&destination) {
            Some(current) if current.can_become(&next) => {
                debug!("{}: {} -> {}", destination, current.name(), next.name());
                map.insert(destination, next.clone());
                true
            }
            Some(current) => {
                result = Err(ChannelError::invalid_transition(destination, current, &next));
                false
            }
            None => {
                result = Err(ChannelError::InvalidTransition {
                    destination,
                    from: "idle",
                    to: next.name(),
                });
                false
            }
        });
        result
    }

    /// Current outcome of one destination.
    pub fn get(&self, destination: Destination) -> Option<DeliveryOutcome> {
        self.tx.borrow().get(&destination).cloned()
    }

    /// Copy of every destination's outcome.
    pub fn snapshot(&self) -> StatusMap {
        self.tx.borrow().clone()
    }

    /// Subscribe to status updates.
    pub fn subscribe(&self) -> watch::Receiver<StatusMap> {
        self.tx.subscribe()
    }
}
