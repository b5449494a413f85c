//! Chat partner roster entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user the caller has an existing conversation with, together with the
/// most recent message exchanged (if any).
///
/// Returned by [`crate::history::HistoryClient::chat_partners`]. Purely
/// informational; selecting one of these feeds its `user_id` into
/// [`crate::session::SessionBinder::select_conversation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPartner {
    pub user_id: String,
    pub last_message: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub online: bool,
}
