//! Wire format for inbound live channel events.
//!
//! Inbound frames are JSON objects with `from_id`/`to_id` field names,
//! which differ from the `sender_id`/`receiver_id` names used by the
//! history endpoint. Outbound sends are NOT JSON-wrapped: the raw
//! composed text is the entire frame payload. Both asymmetries are part
//! of the server's protocol contract and must not be normalized here.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::Message;

/// A message event as delivered over the live channel.
#[derive(Debug, Clone, Deserialize)]
pub struct WireChatEvent {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl From<WireChatEvent> for Message {
    fn from(event: WireChatEvent) -> Self {
        Message {
            id: event.id,
            sender_id: event.from_id,
            receiver_id: event.to_id,
            body: event.message,
            sent_at: event.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_event_maps_onto_message() {
        let json = r#"{
            "id": "42",
            "from_id": "alice",
            "to_id": "me",
            "message": "hi there",
            "timestamp": "2025-06-01T12:00:00Z"
        }"#;

        let event: WireChatEvent = serde_json::from_str(json).unwrap();
        let msg: Message = event.into();

        assert_eq!(msg.id, "42");
        assert_eq!(msg.sender_id, "alice");
        assert_eq!(msg.receiver_id, "me");
        assert_eq!(msg.body, "hi there");
        assert_eq!(msg.sent_at.to_rfc3339(), "2025-06-01T12:00:00+00:00");
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let json = r#"{"id": "42", "message": "hi"}"#;
        let result: Result<WireChatEvent, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
