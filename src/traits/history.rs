//! History loading trait abstraction.

use async_trait::async_trait;

use crate::error::ChatError;
use crate::models::{ConversationId, Message};

/// Trait for loading the message history of a conversation.
///
/// A single request/response fetch of the full history — no pagination.
/// Abstracted to enable dependency injection and mocking in tests; the
/// production implementation is [`crate::history::HistoryClient`].
#[async_trait]
pub trait HistoryLoader: Send + Sync {
    /// Fetch the full message history for a conversation, oldest first.
    ///
    /// # Errors
    /// [`ChatError::Network`] if the transport fails,
    /// [`ChatError::Unauthorized`] if the session token is invalid or
    /// expired.
    async fn load(&self, conversation: &ConversationId) -> Result<Vec<Message>, ChatError>;
}
