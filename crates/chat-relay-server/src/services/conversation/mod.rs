//! Per-connection conversation state
//!
//! Provides the append-only turn store and the registry that tracks one
//! conversation per live WebSocket session.

mod registry;
mod store;

pub use registry::{RegistryStats, SessionRegistry};
pub use store::{Conversation, SharedConversation};
