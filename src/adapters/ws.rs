//! Tungstenite-based adapter for the live channel traits.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};

use crate::channel::{ChannelConfig, ChannelState, ChatChannel};
use crate::error::ChatError;
use crate::models::{ConversationId, Message};
use crate::traits::{ChannelConnector, ChannelHandle};

/// Production [`ChannelConnector`] backed by [`ChatChannel`].
#[derive(Debug, Clone)]
pub struct TungsteniteConnector {
    config: ChannelConfig,
}

impl TungsteniteConnector {
    /// Create a connector for the given endpoint configuration.
    pub fn new(config: ChannelConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ChannelConnector for TungsteniteConnector {
    async fn connect(
        &self,
        conversation: &ConversationId,
        token: &str,
    ) -> Result<Arc<dyn ChannelHandle>, ChatError> {
        let channel = ChatChannel::connect(self.config.clone(), conversation.clone(), token).await?;
        Ok(Arc::new(channel))
    }
}

#[async_trait]
impl ChannelHandle for ChatChannel {
    fn conversation(&self) -> &ConversationId {
        ChatChannel::conversation(self)
    }

    async fn send(&self, text: &str) -> Result<(), ChatError> {
        ChatChannel::send(self, text).await
    }

    fn subscribe(&self) -> broadcast::Receiver<Message> {
        ChatChannel::subscribe(self)
    }

    fn state(&self) -> watch::Receiver<ChannelState> {
        self.state_receiver()
    }

    fn close(&self) {
        ChatChannel::close(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connector_failure_surfaces_channel_error() {
        let connector = TungsteniteConnector::new(ChannelConfig {
            host: "127.0.0.1:59999".to_string(),
            use_tls: false,
        });

        let result = connector
            .connect(&ConversationId::new("user-1"), "token")
            .await;
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(matches!(e, ChatError::Channel(_)));
        }
    }
}
