//! Session binder: the orchestrator for the active conversation.
//!
//! The binder is the only component allowed to change which conversation
//! is active, and the sole owner of channel lifecycle. Selecting a
//! conversation tears down any prior channel, clears the transcript,
//! loads history, opens the new channel, and routes inbound events into
//! the transcript.
//!
//! Staleness across conversation switches is decided by a generation
//! counter: every `select_conversation` call bumps it, and both late
//! history responses and late channel events are discarded when their
//! captured generation no longer matches. Channel teardown does not
//! synchronously flush in-flight transport events, so the counter is the
//! authoritative guard.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::channel::ChannelState;
use crate::error::ChatError;
use crate::models::{ConversationId, Message};
use crate::traits::{ChannelConnector, ChannelHandle, HistoryLoader};
use crate::transcript::Transcript;

/// Binds one live channel and one transcript to the selected conversation.
///
/// An owned object, not global state: independent binders can coexist
/// (separate windows, tests).
pub struct SessionBinder {
    history: Arc<dyn HistoryLoader>,
    connector: Arc<dyn ChannelConnector>,
    transcript: Arc<Transcript>,
    auth_token: Mutex<Option<String>>,
    active: Mutex<Option<ConversationId>>,
    channel: tokio::sync::Mutex<Option<Arc<dyn ChannelHandle>>>,
    generation: Arc<AtomicU64>,
    compose: Mutex<String>,
}

impl SessionBinder {
    /// Create a binder in the neutral "no conversation selected" state.
    pub fn new(history: Arc<dyn HistoryLoader>, connector: Arc<dyn ChannelConnector>) -> Self {
        Self {
            history,
            connector,
            transcript: Arc::new(Transcript::new()),
            auth_token: Mutex::new(None),
            active: Mutex::new(None),
            channel: tokio::sync::Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
            compose: Mutex::new(String::new()),
        }
    }

    /// Set the session token at construction time.
    pub fn with_auth_token(self, token: &str) -> Self {
        *self.auth_token.lock().unwrap() = Some(token.to_string());
        self
    }

    /// Replace the session token. The token is opaque and never refreshed
    /// here; `None` makes the next bind fail with `Unauthorized`.
    pub fn set_auth_token(&self, token: Option<String>) {
        *self.auth_token.lock().unwrap() = token;
    }

    /// The currently active conversation, if any.
    pub fn active_conversation(&self) -> Option<ConversationId> {
        self.active.lock().unwrap().clone()
    }

    /// The transcript of the active conversation.
    pub fn transcript(&self) -> Arc<Transcript> {
        self.transcript.clone()
    }

    /// Current live channel state; `Closed` when no channel exists.
    pub async fn channel_state(&self) -> ChannelState {
        match self.channel.lock().await.as_ref() {
            Some(channel) => *channel.state().borrow(),
            None => ChannelState::Closed,
        }
    }

    /// Set the not-yet-sent compose text.
    pub fn set_compose(&self, text: impl Into<String>) {
        *self.compose.lock().unwrap() = text.into();
    }

    /// Current compose text.
    pub fn compose(&self) -> String {
        self.compose.lock().unwrap().clone()
    }

    /// Switch the active conversation, or deselect with `None`.
    ///
    /// Tears down any prior channel, clears the transcript, and — for a
    /// non-null selection — loads history and opens a new channel. If a
    /// later selection supersedes this one while it is in flight, its
    /// results are discarded and this call returns `Ok(())`.
    ///
    /// A history failure does not prevent the channel from opening (the
    /// two binds are independent); the history error is returned after
    /// the channel is up so the UI can show a retry indicator.
    pub async fn select_conversation(
        &self,
        conversation: Option<ConversationId>,
    ) -> Result<(), ChatError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(channel) = self.channel.lock().await.take() {
            channel.close();
        }
        self.transcript.clear();
        *self.active.lock().unwrap() = conversation.clone();

        let Some(conversation) = conversation else {
            debug!("Conversation deselected");
            return Ok(());
        };

        let token = self
            .auth_token
            .lock()
            .unwrap()
            .clone()
            .ok_or(ChatError::Unauthorized)?;

        info!("Binding session to conversation {}", conversation);

        let history_err = match self.history.load(&conversation).await {
            Ok(messages) => {
                if self.generation.load(Ordering::SeqCst) != generation {
                    debug!(
                        "Discarding stale history for conversation {}",
                        conversation
                    );
                    return Ok(());
                }
                self.transcript.replace(messages);
                None
            }
            Err(e) => {
                warn!("History load failed for conversation {}: {}", conversation, e);
                Some(e)
            }
        };

        let handle = self.connector.connect(&conversation, &token).await?;

        {
            let mut guard = self.channel.lock().await;
            if self.generation.load(Ordering::SeqCst) != generation {
                drop(guard);
                debug!("Selection superseded, closing channel for {}", conversation);
                handle.close();
                return Ok(());
            }
            let receiver = handle.subscribe();
            *guard = Some(handle);
            self.spawn_event_router(receiver, conversation, generation);
        }

        match history_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Send composed text through the live channel.
    ///
    /// No-op if `text` is blank after trimming or no channel is `Open`;
    /// neither case touches the transport. On successful submission the
    /// compose buffer is cleared. The message is NOT appended locally —
    /// the server's echo arrives as an inbound event and performs the
    /// append.
    pub async fn send_message(&self, text: &str) -> Result<(), ChatError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let guard = self.channel.lock().await;
        let Some(channel) = guard.as_ref() else {
            debug!("Dropping send, no channel");
            return Ok(());
        };
        if *channel.state().borrow() != ChannelState::Open {
            debug!("Dropping send, channel not open");
            return Ok(());
        }

        channel.send(text).await?;
        drop(guard);

        self.compose.lock().unwrap().clear();
        Ok(())
    }

    /// Send whatever is in the compose buffer.
    pub async fn send_compose(&self) -> Result<(), ChatError> {
        let text = self.compose();
        self.send_message(&text).await
    }

    /// Route inbound events into the transcript while this session
    /// generation is still current and the event belongs to the bound
    /// conversation.
    fn spawn_event_router(
        &self,
        mut receiver: broadcast::Receiver<Message>,
        conversation: ConversationId,
        generation: u64,
    ) {
        let transcript = self.transcript.clone();
        let generations = self.generation.clone();

        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(message) => {
                        if generations.load(Ordering::SeqCst) != generation {
                            debug!(
                                "Discarding late event for superseded session of {}",
                                conversation
                            );
                            break;
                        }
                        if !message.belongs_to(&conversation) {
                            warn!(
                                "Dropping event outside conversation {}: message {}",
                                conversation, message.id
                            );
                            continue;
                        }
                        transcript.append(message);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Inbound event stream lagged, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            debug!("Event router ended for conversation {}", conversation);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockConnector, MockHistoryLoader};

    fn binder() -> SessionBinder {
        SessionBinder::new(
            Arc::new(MockHistoryLoader::new()),
            Arc::new(MockConnector::new()),
        )
        .with_auth_token("test-token")
    }

    #[tokio::test]
    async fn test_initial_state_is_neutral() {
        let binder = binder();
        assert!(binder.active_conversation().is_none());
        assert!(binder.transcript().is_empty());
        assert_eq!(binder.channel_state().await, ChannelState::Closed);
    }

    #[tokio::test]
    async fn test_select_none_on_fresh_binder_is_neutral() {
        let binder = binder();
        binder.select_conversation(None).await.unwrap();
        assert!(binder.active_conversation().is_none());
        assert_eq!(binder.channel_state().await, ChannelState::Closed);
    }

    #[tokio::test]
    async fn test_select_without_token_is_unauthorized() {
        let binder = SessionBinder::new(
            Arc::new(MockHistoryLoader::new()),
            Arc::new(MockConnector::new()),
        );
        let result = binder
            .select_conversation(Some(ConversationId::new("alice")))
            .await;
        assert!(matches!(result, Err(ChatError::Unauthorized)));
        assert_eq!(binder.channel_state().await, ChannelState::Closed);
    }

    #[tokio::test]
    async fn test_compose_buffer_set_and_read() {
        let binder = binder();
        binder.set_compose("draft");
        assert_eq!(binder.compose(), "draft");
    }

    #[tokio::test]
    async fn test_connect_failure_leaves_session_degraded() {
        let connector = Arc::new(MockConnector::new());
        connector.fail_next();
        let binder = SessionBinder::new(Arc::new(MockHistoryLoader::new()), connector)
            .with_auth_token("test-token");

        let result = binder
            .select_conversation(Some(ConversationId::new("alice")))
            .await;
        assert!(matches!(result, Err(ChatError::Channel(_))));
        // Conversation stays selected, channel stays closed
        assert_eq!(
            binder.active_conversation(),
            Some(ConversationId::new("alice"))
        );
        assert_eq!(binder.channel_state().await, ChannelState::Closed);
    }
}
