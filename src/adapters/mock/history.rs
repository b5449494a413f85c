//! Mock history loader for testing.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::ChatError;
use crate::models::{ConversationId, Message};
use crate::traits::HistoryLoader;

/// Mock [`HistoryLoader`] with configurable responses.
///
/// Supports per-conversation canned histories, forced failures, and
/// gates that hold a load in flight until released — used to exercise
/// the stale-history race in the session binder.
#[derive(Default)]
pub struct MockHistoryLoader {
    responses: Mutex<HashMap<String, Vec<Message>>>,
    failures: Mutex<HashSet<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl MockHistoryLoader {
    /// Create a mock that returns an empty history for every conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canned history for a conversation.
    pub fn set_history(&self, conversation: &ConversationId, messages: Vec<Message>) {
        self.responses
            .lock()
            .unwrap()
            .insert(conversation.as_str().to_string(), messages);
    }

    /// Make loads for a conversation fail with a network error.
    pub fn fail_for(&self, conversation: &ConversationId) {
        self.failures
            .lock()
            .unwrap()
            .insert(conversation.as_str().to_string());
    }

    /// Hold loads for a conversation until the returned gate is notified.
    pub fn gate_for(&self, conversation: &ConversationId) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(conversation.as_str().to_string(), gate.clone());
        gate
    }

    /// Conversations loaded so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryLoader for MockHistoryLoader {
    async fn load(&self, conversation: &ConversationId) -> Result<Vec<Message>, ChatError> {
        self.calls
            .lock()
            .unwrap()
            .push(conversation.as_str().to_string());

        let gate = self
            .gates
            .lock()
            .unwrap()
            .get(conversation.as_str())
            .cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failures.lock().unwrap().contains(conversation.as_str()) {
            return Err(ChatError::Network("mock history failure".to_string()));
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(conversation.as_str())
            .cloned()
            .unwrap_or_default())
    }
}
