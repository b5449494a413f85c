//! Mock live channel for testing.
//!
//! Allows injecting inbound messages, capturing outbound frames, and
//! controlling connection state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};

use crate::channel::ChannelState;
use crate::error::{ChannelError, ChatError};
use crate::models::{ConversationId, Message};
use crate::traits::{ChannelConnector, ChannelHandle};

/// Mock [`ChannelHandle`] created by [`MockConnector`].
pub struct MockChannel {
    conversation: ConversationId,
    incoming_tx: broadcast::Sender<Message>,
    state_tx: watch::Sender<ChannelState>,
    state_rx: watch::Receiver<ChannelState>,
    sent_frames: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl MockChannel {
    /// Create a mock channel in `Open` state.
    pub fn new(conversation: ConversationId) -> Arc<Self> {
        let (incoming_tx, _) = broadcast::channel(100);
        let (state_tx, state_rx) = watch::channel(ChannelState::Open);
        Arc::new(Self {
            conversation,
            incoming_tx,
            state_tx,
            state_rx,
            sent_frames: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        })
    }

    /// Inject an inbound message, delivered to all subscribers.
    pub fn inject(&self, message: Message) {
        // Ignore send errors (no subscribers)
        let _ = self.incoming_tx.send(message);
    }

    /// Set the connection state.
    pub fn set_state(&self, state: ChannelState) {
        let _ = self.state_tx.send(state);
    }

    /// Raw text payloads sent through this channel, in order.
    pub fn sent_frames(&self) -> Vec<String> {
        self.sent_frames.lock().unwrap().clone()
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelHandle for MockChannel {
    fn conversation(&self) -> &ConversationId {
        &self.conversation
    }

    async fn send(&self, text: &str) -> Result<(), ChatError> {
        if *self.state_rx.borrow() != ChannelState::Open {
            return Err(ChannelError::Disconnected.into());
        }
        self.sent_frames.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.incoming_tx.subscribe()
    }

    fn state(&self) -> watch::Receiver<ChannelState> {
        self.state_rx.clone()
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let _ = self.state_tx.send(ChannelState::Closed);
    }
}

/// Mock [`ChannelConnector`] that hands out [`MockChannel`]s and keeps
/// them reachable for inspection.
#[derive(Default)]
pub struct MockConnector {
    channels: Mutex<Vec<Arc<MockChannel>>>,
    tokens: Mutex<Vec<String>>,
    fail_next: AtomicBool,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `connect` call fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// All channels handed out so far, oldest first.
    pub fn channels(&self) -> Vec<Arc<MockChannel>> {
        self.channels.lock().unwrap().clone()
    }

    /// The most recently connected channel, if any.
    pub fn last_channel(&self) -> Option<Arc<MockChannel>> {
        self.channels.lock().unwrap().last().cloned()
    }

    /// Tokens passed to `connect`, in call order.
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    /// Number of channels currently in `Open` state.
    pub fn open_count(&self) -> usize {
        self.channels
            .lock()
            .unwrap()
            .iter()
            .filter(|c| *c.state_rx.borrow() == ChannelState::Open)
            .count()
    }
}

#[async_trait]
impl ChannelConnector for MockConnector {
    async fn connect(
        &self,
        conversation: &ConversationId,
        token: &str,
    ) -> Result<Arc<dyn ChannelHandle>, ChatError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ChannelError::ConnectionFailed("mock connect failure".to_string()).into());
        }

        self.tokens.lock().unwrap().push(token.to_string());

        let channel = MockChannel::new(conversation.clone());
        self.channels.lock().unwrap().push(channel.clone());
        Ok(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn message(id: &str) -> Message {
        Message {
            id: id.to_string(),
            sender_id: "alice".to_string(),
            receiver_id: "me".to_string(),
            body: "hi".to_string(),
            sent_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_inject_reaches_subscribers() {
        let channel = MockChannel::new(ConversationId::new("alice"));
        let mut rx = channel.subscribe();

        channel.inject(message("1"));
        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, "1");
    }

    #[tokio::test]
    async fn test_send_captures_frames_while_open() {
        let channel = MockChannel::new(ConversationId::new("alice"));
        channel.send("hello").await.unwrap();
        assert_eq!(channel.sent_frames(), vec!["hello"]);
    }

    #[tokio::test]
    async fn test_send_fails_when_not_open() {
        let channel = MockChannel::new(ConversationId::new("alice"));
        channel.set_state(ChannelState::Closed);
        let result = channel.send("hello").await;
        assert!(matches!(
            result,
            Err(ChatError::Channel(ChannelError::Disconnected))
        ));
    }

    #[tokio::test]
    async fn test_close_is_observable() {
        let channel = MockChannel::new(ConversationId::new("alice"));
        assert!(!channel.is_closed());
        ChannelHandle::close(channel.as_ref());
        assert!(channel.is_closed());
        assert_eq!(*channel.state().borrow(), ChannelState::Closed);
    }

    #[tokio::test]
    async fn test_connector_tracks_channels_and_tokens() {
        let connector = MockConnector::new();
        connector
            .connect(&ConversationId::new("alice"), "tok-1")
            .await
            .unwrap();
        connector
            .connect(&ConversationId::new("bob"), "tok-2")
            .await
            .unwrap();

        assert_eq!(connector.channels().len(), 2);
        assert_eq!(connector.tokens(), vec!["tok-1", "tok-2"]);
        assert_eq!(
            connector.last_channel().unwrap().conversation.as_str(),
            "bob"
        );
    }

    #[tokio::test]
    async fn test_connector_fail_next() {
        let connector = MockConnector::new();
        connector.fail_next();

        let result = connector.connect(&ConversationId::new("alice"), "tok").await;
        assert!(result.is_err());

        // Failure is one-shot
        let result = connector.connect(&ConversationId::new("alice"), "tok").await;
        assert!(result.is_ok());
    }
}
