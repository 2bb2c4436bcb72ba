//! Multi-destination dispatch.
//!
//! A send fans out to every enabled destination at once, each in its own
//! spawned task. Tasks keep running and keep the tracker current even if the
//! caller stops waiting. Once every destination has settled, the outcomes
//! are aggregated and, if anything got through, recorded in history.

use crate::delivery::{Aggregate, DeliveryOutcome, SendResult, StatusMap, StatusTracker};
use crate::error::ChannelError;
use crate::message::{Message, RichEmbed};
use crate::recorder::OutcomeRecorder;
use crate::traits::AdapterFactory;
use crate::Result;
use futures::future::join_all;
use kokosend_core::{Destination, HistoryEntry, HistoryStatus, Target};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// State shared with spawned delivery tasks.
#[derive(Clone)]
struct Shared {
    factory: Arc<dyn AdapterFactory>,
    recorder: Arc<dyn OutcomeRecorder>,
    tracker: Arc<StatusTracker>,
}

/// Coordinates sends and retries across destinations.
pub struct Dispatcher {
    shared: Shared,
    last_targets: Arc<Mutex<Vec<Target>>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("status", &self.shared.tracker.snapshot())
            .finish()
    }
}

impl Dispatcher {
    /// Create a dispatcher.
    pub fn new(factory: Arc<dyn AdapterFactory>, recorder: Arc<dyn OutcomeRecorder>) -> Self {
        Self {
            shared: Shared {
                factory,
                recorder,
                tracker: Arc::new(StatusTracker::new()),
            },
            last_targets: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Current outcome of every destination.
    pub fn status(&self) -> StatusMap {
        self.shared.tracker.snapshot()
    }

    /// Subscribe to status updates.
    pub fn subscribe(&self) -> watch::Receiver<StatusMap> {
        self.shared.tracker.subscribe()
    }

    /// Send a message to the enabled targets.
    ///
    /// Never fails: delivery problems become `Error` outcomes. Returns a
    /// no-op result without touching the network when there is nothing to
    /// send or no target is enabled.
    pub async fn send(&self, message: Message, targets: Vec<Target>) -> SendResult {
        if !message.has_content() {
            debug!("Message is empty, nothing to send");
            return SendResult::noop();
        }
        if !targets.iter().any(|t| t.enabled) {
            debug!("No destination enabled, nothing to send");
            return SendResult::noop();
        }

        *self.last_targets.lock() = targets.clone();
        let shared = self.shared.clone();

        let handle = tokio::spawn(async move {
            shared.tracker.reset(&targets);
            let message = Arc::new(message);

            info!(
                "Sending to {} destination(s)",
                targets.iter().filter(|t| t.enabled).count()
            );

            let tasks: Vec<_> = targets
                .into_iter()
                .filter(|t| t.enabled)
                .filter_map(|target| shared.launch(target, message.clone()))
                .collect();
            shared.settle(tasks).await;

            let result = SendResult::from_outcomes(shared.tracker.snapshot());
            shared.record_send(&message.text, &result);
            result
        });

        match handle.await {
            Ok(result) => result,
            Err(e) => {
                warn!("Send task failed: {}", e);
                SendResult::from_outcomes(self.shared.tracker.snapshot())
            }
        }
    }

    /// Retry one failed destination with the credentials of the last send.
    ///
    /// `embed` replaces the message's embed for this attempt. Other
    /// destinations keep their outcomes.
    pub async fn retry(
        &self,
        destination: Destination,
        message: Message,
        embed: Option<RichEmbed>,
    ) -> Result<SendResult> {
        let current = self.shared.tracker.get(destination);
        if !matches!(current, Some(DeliveryOutcome::Error { .. })) {
            return Err(ChannelError::InvalidTransition {
                destination,
                from: current.as_ref().map_or("idle", DeliveryOutcome::name),
                to: DeliveryOutcome::Pending.name(),
            });
        }

        let target = self
            .last_targets
            .lock()
            .iter()
            .find(|t| t.destination() == destination)
            .cloned()
            .ok_or_else(|| ChannelError::Internal(format!("no snapshot for {}", destination)))?;

        self.shared
            .tracker
            .transition(destination, DeliveryOutcome::Pending)?;
        info!("Retrying {}", destination);

        let message = Message { embed, ..message };
        let shared = self.shared.clone();

        let handle = tokio::spawn(async move {
            let message = Arc::new(message);
            let tasks: Vec<_> = shared.launch(target, message.clone()).into_iter().collect();
            shared.settle(tasks).await;

            let result = SendResult::from_outcomes(shared.tracker.snapshot());
            if result.aggregate == Some(Aggregate::FullSuccess) {
                shared.recorder.record(HistoryEntry::new(
                    message.text.clone(),
                    result.succeeded(),
                    HistoryStatus::Success,
                ));
            }
            result
        });

        handle
            .await
            .map_err(|e| ChannelError::Internal(format!("retry task failed: {}", e)))
    }
}

impl Shared {
    /// Start delivery to one enabled target.
    ///
    /// Incomplete credentials settle the destination as `Error` right away,
    /// without building an adapter.
    fn launch(
        &self,
        target: Target,
        message: Arc<Message>,
    ) -> Option<(Destination, JoinHandle<()>)> {
        let destination = target.destination();
        let missing = target.credentials.missing_fields();
        if !missing.is_empty() {
            let err = ChannelError::missing_credential(destination, missing);
            warn!("{}", err);
            self.settle_one(destination, DeliveryOutcome::error(err.to_string()));
            return None;
        }

        let shared = self.clone();
        let handle = tokio::spawn(async move {
            let outcome = match shared.deliver(&target, &message).await {
                Ok(()) => {
                    info!("{} delivered", destination);
                    DeliveryOutcome::Success
                }
                Err(e) => {
                    warn!("{} failed: {}", destination, e);
                    DeliveryOutcome::error(e.to_string())
                }
            };
            shared.settle_one(destination, outcome);
        });

        Some((destination, handle))
    }

    async fn deliver(&self, target: &Target, message: &Message) -> Result<()> {
        let adapter = self.factory.create(&target.credentials)?;
        if adapter.supports_embeds() {
            adapter.deliver(message).await
        } else {
            adapter.deliver(&message.with_embed_inlined()).await
        }
    }

    /// Wait for every launched task; a task that died settles as `Error`.
    async fn settle(&self, tasks: Vec<(Destination, JoinHandle<()>)>) {
        let (destinations, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
        for (destination, joined) in destinations.into_iter().zip(join_all(handles).await) {
            if let Err(e) = joined {
                self.settle_one(destination, DeliveryOutcome::error(format!("task failed: {}", e)));
            }
        }
    }

    fn settle_one(&self, destination: Destination, outcome: DeliveryOutcome) {
        if let Err(e) = self.tracker.transition(destination, outcome) {
            warn!("Dropped status update: {}", e);
        }
    }

    fn record_send(&self, text: &str, result: &SendResult) {
        let status = match result.aggregate {
            Some(Aggregate::FullSuccess) => HistoryStatus::Success,
            Some(Aggregate::PartialSuccess) => HistoryStatus::Partial,
            _ => return,
        };
        let succeeded = result.succeeded();
        if succeeded.is_empty() {
            return;
        }
        self.recorder
            .record(HistoryEntry::new(text, succeeded, status));
    }
}
