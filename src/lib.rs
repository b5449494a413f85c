//! Sangam chat session core.
//!
//! Client-side machinery for binding one live message channel to the
//! currently selected 1:1 conversation: history loading, a WebSocket
//! live channel, an ordered transcript, and the session binder that
//! orchestrates them. The rendering layer consumes this crate through
//! transcript snapshots and channel subscriptions.

pub mod adapters;
pub mod channel;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod session;
pub mod traits;
pub mod transcript;

pub use channel::ChannelState;
pub use config::ChatConfig;
pub use error::{ChannelError, ChatError};
pub use history::HistoryClient;
pub use models::{ChatPartner, ConversationId, Message};
pub use session::SessionBinder;
pub use transcript::Transcript;
