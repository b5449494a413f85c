//! Live channel for real-time message delivery.
//!
//! One persistent WebSocket connection, scoped to a single conversation.
//! The client has no automatic reconnect: a fatal transport error moves
//! the channel to `Closed` and stays there. Re-binding happens by
//! reselecting the conversation through the session binder.

pub mod client;
pub mod wire;

pub use client::{ChatChannel, ChannelConfig};
pub use wire::WireChatEvent;

/// Live channel connection state.
///
/// `Closed -> Connecting -> Open -> Closed`, terminal on explicit close
/// or fatal transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Closed,
    Connecting,
    Open,
}
