//! Ordered transcript of the active conversation.
//!
//! The transcript is scoped to exactly one conversation at a time: it is
//! cleared when the selection changes, fully replaced by a history load,
//! and appended to by live channel events. Nothing is persisted.
//!
//! Observers (the rendered message list) subscribe through a watch channel
//! and receive a full snapshot on every mutation. Appends do not
//! de-duplicate: if the transport redelivers an event, it appears twice.

use tokio::sync::watch;

use crate::models::Message;

/// Ordered sequence of messages for the active conversation.
pub struct Transcript {
    snapshot_tx: watch::Sender<Vec<Message>>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        let (snapshot_tx, _) = watch::channel(Vec::new());
        Self { snapshot_tx }
    }

    /// Discard the current content and install `messages` as the new
    /// ordered transcript. Used after a successful history load.
    pub fn replace(&self, messages: Vec<Message>) {
        self.snapshot_tx.send_replace(messages);
    }

    /// Append a message to the end of the sequence.
    pub fn append(&self, message: Message) {
        self.snapshot_tx.send_modify(|messages| messages.push(message));
    }

    /// Empty the transcript. Called when the active conversation changes
    /// or becomes none.
    pub fn clear(&self) {
        self.snapshot_tx.send_modify(|messages| messages.clear());
    }

    /// Current messages, in order.
    pub fn messages(&self) -> Vec<Message> {
        self.snapshot_tx.borrow().clone()
    }

    /// Number of messages currently held.
    pub fn len(&self) -> usize {
        self.snapshot_tx.borrow().len()
    }

    /// Whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshot_tx.borrow().is_empty()
    }

    /// Subscribe to transcript snapshots. The receiver is notified on
    /// every replace, append, and clear.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Message>> {
        self.snapshot_tx.subscribe()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
