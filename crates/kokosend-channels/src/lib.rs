//! Destination adapters and dispatch for KokoSend.
//!
//! This crate turns one composed [`Message`] into deliveries on every
//! enabled destination: it splits over-long text, talks to the webhook and
//! bot backends, tracks per-destination status and supports retrying the
//! destinations that failed.

pub mod attachment;
pub mod bot;
pub mod delivery;
pub mod dispatch;
pub mod error;
pub mod factory;
pub mod message;
pub mod recorder;
pub mod splitter;
pub mod traits;
pub mod webhook;

pub use attachment::{Attachment, AttachmentType};
pub use bot::BotChannel;
pub use delivery::{Aggregate, DeliveryOutcome, SendResult, StatusMap, StatusTracker};
pub use dispatch::Dispatcher;
pub use error::ChannelError;
pub use factory::HttpAdapterFactory;
pub use message::{Message, RichEmbed};
pub use recorder::{NullRecorder, OutcomeRecorder};
pub use splitter::{split, Split};
pub use traits::{AdapterFactory, DestinationAdapter};
pub use webhook::WebhookChannel;

/// Result type for channel operations.
pub type Result<T> = std::result::Result<T, ChannelError>;
