//! Live channel trait abstractions.
//!
//! Two seams: [`ChannelConnector`] establishes a connection for a
//! conversation, and [`ChannelHandle`] is the resulting live connection.
//! The traits use tokio broadcast and watch channels for message fan-out
//! and state monitoring, enabling mocking in tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};

use crate::channel::ChannelState;
use crate::error::ChatError;
use crate::models::{ConversationId, Message};

/// A live connection scoped to one conversation.
#[async_trait]
pub trait ChannelHandle: Send + Sync {
    /// The conversation this handle is scoped to.
    fn conversation(&self) -> &ConversationId;

    /// Transmit the raw text payload to the counterpart. Fire-and-forget:
    /// no acknowledgement is awaited, and the local send is not echoed
    /// back through [`subscribe`](Self::subscribe) — only the server's
    /// resulting broadcast is.
    async fn send(&self, text: &str) -> Result<(), ChatError>;

    /// Subscribe to decoded inbound messages, in transport arrival order.
    fn subscribe(&self) -> broadcast::Receiver<Message>;

    /// Get a receiver for connection state changes.
    fn state(&self) -> watch::Receiver<ChannelState>;

    /// Close the connection and release it. Idempotent; valid from any
    /// state.
    fn close(&self);
}

/// Factory for live connections.
#[async_trait]
pub trait ChannelConnector: Send + Sync {
    /// Open a connection scoped to `conversation`, authenticated via
    /// `token` passed as a connection parameter.
    async fn connect(
        &self,
        conversation: &ConversationId,
        token: &str,
    ) -> Result<Arc<dyn ChannelHandle>, ChatError>;
}
