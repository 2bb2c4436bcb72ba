//! Sink for successful send outcomes.

use kokosend_core::{HistoryEntry, HistoryStore};
use tracing::{debug, warn};

/// Receives a history entry whenever a send reaches at least one destination.
///
/// Recording is fire-and-forget: implementations deal with their own failures.
#[cfg_attr(test, mockall::automock)]
pub trait OutcomeRecorder: Send + Sync {
    /// Record one entry.
    fn record(&self, entry: HistoryEntry);
}

impl OutcomeRecorder for HistoryStore {
    fn record(&self, entry: HistoryEntry) {
        let id = entry.id.clone();
        match self.add(entry) {
            Ok(()) => debug!("Recorded history entry {}", id),
            Err(e) => warn!("Failed to record history entry {}: {}", id, e),
        }
    }
}

/// Recorder that drops every entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecorder;

impl OutcomeRecorder for NullRecorder {
    fn record(&self, _entry: HistoryEntry) {}
}
