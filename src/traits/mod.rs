//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HistoryLoader`] - request/response history fetch
//! - [`ChannelConnector`] / [`ChannelHandle`] - live channel lifecycle

pub mod channel;
pub mod history;

pub use channel::{ChannelConnector, ChannelHandle};
pub use history::HistoryLoader;
