//! Test doubles for the trait seams.

pub mod channel;
pub mod history;

pub use channel::{MockChannel, MockConnector};
pub use history::MockHistoryLoader;
