//! Domain types shared across the crate.

pub mod message;
pub mod partner;

pub use message::{ConversationId, Message};
pub use partner::ChatPartner;
