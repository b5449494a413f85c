//! Error types for the chat session core.
//!
//! The taxonomy matches what the surrounding UI needs to distinguish:
//! network failures are retryable by reselecting the conversation,
//! `Unauthorized` requires a fresh login, and channel errors degrade the
//! session (sending disabled) without tearing down the transcript.

use thiserror::Error;

/// Live channel (WebSocket) errors.
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    /// Connection or handshake failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection dropped by the server or the transport
    #[error("Disconnected from server")]
    Disconnected,

    /// Failed to hand a frame to the connection
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Inbound frame could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Unified error type for chat operations.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Transport unreachable or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Session token missing, expired, or rejected
    #[error("Unauthorized: session token missing or rejected")]
    Unauthorized,

    /// Live channel failure
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Server returned a non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Response body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChatError {
    /// Convert a reqwest error into the matching variant.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            ChatError::Network(err.to_string())
        } else if let Some(status) = err.status() {
            ChatError::Server {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ChatError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_error_display() {
        assert_eq!(
            ChannelError::ConnectionFailed("timeout".to_string()).to_string(),
            "Connection failed: timeout"
        );
        assert_eq!(
            ChannelError::Disconnected.to_string(),
            "Disconnected from server"
        );
        assert_eq!(
            ChannelError::SendFailed("channel closed".to_string()).to_string(),
            "Send failed: channel closed"
        );
        assert_eq!(
            ChannelError::Parse("invalid json".to_string()).to_string(),
            "Parse error: invalid json"
        );
    }

    #[test]
    fn test_chat_error_display() {
        assert_eq!(
            ChatError::Network("refused".to_string()).to_string(),
            "Network error: refused"
        );
        assert_eq!(
            ChatError::Unauthorized.to_string(),
            "Unauthorized: session token missing or rejected"
        );
        assert_eq!(
            ChatError::Server {
                status: 500,
                message: "boom".to_string()
            }
            .to_string(),
            "Server error (500): boom"
        );
    }

    #[test]
    fn test_channel_error_converts_into_chat_error() {
        let err: ChatError = ChannelError::Disconnected.into();
        assert!(matches!(err, ChatError::Channel(ChannelError::Disconnected)));
    }

    #[test]
    fn test_chat_error_implements_error_trait() {
        let err = ChatError::Unauthorized;
        let _: &dyn std::error::Error = &err;
    }
}
