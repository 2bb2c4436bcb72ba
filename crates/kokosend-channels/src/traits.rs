//! Core destination traits.

use crate::message::Message;
use crate::Result;
use async_trait::async_trait;
use kokosend_core::{Credentials, Destination};
use std::fmt::Debug;

/// A backend that can deliver one message, possibly in several physical calls.
#[async_trait]
pub trait DestinationAdapter: Send + Sync + Debug {
    /// Destination this adapter delivers to.
    fn destination(&self) -> Destination;

    /// Maximum characters accepted inline in one text call.
    fn char_limit(&self) -> usize;

    /// Whether the backend renders rich embeds natively.
    fn supports_embeds(&self) -> bool {
        false
    }

    /// Deliver a message.
    ///
    /// Text longer than [`char_limit`](Self::char_limit) is split by the
    /// adapter itself. An `Ok` means every physical call succeeded.
    async fn deliver(&self, message: &Message) -> Result<()>;
}

/// Builds adapters from credential snapshots.
pub trait AdapterFactory: Send + Sync {
    /// Create an adapter for complete credentials.
    fn create(&self, credentials: &Credentials) -> Result<Box<dyn DestinationAdapter>>;
}
