//! Chat message and conversation identifier types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a 1:1 conversation.
///
/// Conversations are keyed by the counterpart user's id; the same value
/// doubles as the routing key for the live channel. The inner string is
/// opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Create a conversation id from the counterpart user's id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single chat message.
///
/// Immutable once created. `sent_at` is server-assigned; within a session,
/// arrival order is treated as sufficient ordering and messages are never
/// re-sorted client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    /// Whether this message belongs to the given conversation, i.e. the
    /// counterpart is either the sender or the receiver.
    pub fn belongs_to(&self, conversation: &ConversationId) -> bool {
        self.sender_id == conversation.as_str() || self.receiver_id == conversation.as_str()
    }
}
