//! Concrete implementations of the trait seams.
//!
//! - [`TungsteniteConnector`] - live channel over tokio-tungstenite
//! - [`crate::history::HistoryClient`] - history over reqwest (lives in
//!   `crate::history`, implements [`crate::traits::HistoryLoader`])
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHistoryLoader`] - canned histories, failures, gated loads
//! - [`mock::MockConnector`] / [`mock::MockChannel`] - event injection and
//!   sent-frame capture

pub mod mock;
pub mod ws;

pub use mock::{MockChannel, MockConnector, MockHistoryLoader};
pub use ws::TungsteniteConnector;
