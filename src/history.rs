//! HTTP client for message history and the conversation roster.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ChatConfig;
use crate::error::ChatError;
use crate::models::{ChatPartner, ConversationId, Message};
use crate::traits::HistoryLoader;

/// A history row as returned by the history endpoint.
///
/// Field names differ from the live channel's wire events (`sender_id`
/// here vs `from_id` there); both map onto [`Message`].
#[derive(Debug, Clone, Deserialize)]
struct HistoryRow {
    id: String,
    sender_id: String,
    receiver_id: String,
    message: String,
    timestamp: DateTime<Utc>,
}

impl From<HistoryRow> for Message {
    fn from(row: HistoryRow) -> Self {
        Message {
            id: row.id,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            body: row.message,
            sent_at: row.timestamp,
        }
    }
}

/// A roster row from the users-with-last-message endpoint. Rows without
/// a `user` object are skipped.
#[derive(Debug, Clone, Deserialize)]
struct PartnerRow {
    user: Option<PartnerUser>,
    last_message: Option<String>,
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
struct PartnerUser {
    id: String,
    #[serde(rename = "onlineUsers", default)]
    online: bool,
}

/// Error detail body used by the backend for auth failures.
#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    detail: String,
}

/// Client for the chat HTTP endpoints.
///
/// Holds the session token as opaque state; it is never refreshed here.
/// If it expires mid-session the next call fails with
/// [`ChatError::Unauthorized`] and the embedding app must re-login.
pub struct HistoryClient {
    /// Base URL for the chat API
    pub base_url: String,
    auth_token: Option<String>,
    /// Reusable HTTP client
    client: reqwest::Client,
}

impl HistoryClient {
    /// Create a client from a [`ChatConfig`].
    pub fn new(config: &ChatConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            base_url: config.base_url.clone(),
            auth_token: None,
            client,
        }
    }

    /// Create a client with a custom base URL.
    pub fn with_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
            client: reqwest::Client::new(),
        }
    }

    /// Set the session token used for the `Authorization` header.
    pub fn with_auth(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    /// Fetch the full message history for a conversation in one call.
    /// No pagination; the server returns rows oldest first.
    pub async fn fetch_history(
        &self,
        conversation: &ConversationId,
    ) -> Result<Vec<Message>, ChatError> {
        let url = format!("{}/chat/chat/history/{}", self.base_url, conversation);
        debug!("Fetching history for conversation {}", conversation);

        let response = self.authorized_get(&url).await?;
        let response = Self::check_status(response).await?;

        let rows: Vec<HistoryRow> = response.json().await.map_err(ChatError::from_reqwest)?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    /// Fetch the conversation roster: users the caller has chatted with,
    /// each with their last message.
    pub async fn chat_partners(&self) -> Result<Vec<ChatPartner>, ChatError> {
        let url = format!("{}/chat/users_with_last_message", self.base_url);

        let response = self.authorized_get(&url).await?;
        let response = Self::check_status(response).await?;

        let rows: Vec<PartnerRow> = response.json().await.map_err(ChatError::from_reqwest)?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                row.user.map(|user| ChatPartner {
                    user_id: user.id,
                    last_message: row.last_message,
                    timestamp: row.timestamp,
                    online: user.online,
                })
            })
            .collect())
    }

    async fn authorized_get(&self, url: &str) -> Result<reqwest::Response, ChatError> {
        let mut builder = self.client.get(url);
        if let Some(token) = &self.auth_token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.send().await.map_err(ChatError::from_reqwest)
    }

    /// Map non-success statuses onto the error taxonomy. The backend
    /// signals auth failure either with 401 or with a "token expired"
    /// detail message; both become [`ChatError::Unauthorized`].
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorDetail>(&body)
            .map(|d| d.detail)
            .unwrap_or_default();

        if status.as_u16() == 401 || detail.to_lowercase().contains("token expired") {
            return Err(ChatError::Unauthorized);
        }

        Err(ChatError::Server {
            status: status.as_u16(),
            message: if detail.is_empty() { body } else { detail },
        })
    }
}

#[async_trait]
impl HistoryLoader for HistoryClient {
    async fn load(&self, conversation: &ConversationId) -> Result<Vec<Message>, ChatError> {
        self.fetch_history(conversation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_url_trims_trailing_slash() {
        let client = HistoryClient::with_url("http://example.com/");
        assert_eq!(client.base_url, "http://example.com");
    }

    #[test]
    fn test_history_row_maps_onto_message() {
        let json = r#"{
            "id": "7",
            "sender_id": "alice",
            "receiver_id": "me",
            "message": "hello",
            "timestamp": "2025-06-01T12:00:00Z"
        }"#;
        let row: HistoryRow = serde_json::from_str(json).unwrap();
        let msg: Message = row.into();
        assert_eq!(msg.id, "7");
        assert_eq!(msg.sender_id, "alice");
        assert_eq!(msg.receiver_id, "me");
        assert_eq!(msg.body, "hello");
    }

    #[test]
    fn test_partner_row_without_user_is_skippable() {
        let json = r#"{"user": null, "last_message": "hi", "timestamp": null}"#;
        let row: PartnerRow = serde_json::from_str(json).unwrap();
        assert!(row.user.is_none());
    }

    #[test]
    fn test_partner_user_defaults_offline() {
        let json = r#"{"id": "u-1"}"#;
        let user: PartnerUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u-1");
        assert!(!user.online);
    }

    #[tokio::test]
    async fn test_fetch_history_connection_refused() {
        // Port is unlikely to be in use
        let client = HistoryClient::with_url("http://127.0.0.1:59999");
        let result = client.fetch_history(&ConversationId::new("u")).await;
        assert!(matches!(result, Err(ChatError::Network(_))));
    }
}
