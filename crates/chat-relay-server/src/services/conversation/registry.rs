use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::models::chat::SessionId;

use super::store::{Conversation, SharedConversation};

/// Thread-safe registry of live sessions.
/// Uses DashMap for lock-free concurrent access; entries live exactly as
/// long as their WebSocket connection.
#[derive(Clone)]
pub struct SessionRegistry {
    /// Session storage: session_id -> conversation handle
    storage: Arc<DashMap<SessionId, SharedConversation>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        info!("Initializing session registry");
        Self {
            storage: Arc::new(DashMap::new()),
        }
    }

    /// Create an empty conversation for a new connection and track it
    pub fn register(&self, session_id: SessionId) -> SharedConversation {
        let conversation = Conversation::shared();
        self.storage.insert(session_id, conversation.clone());
        debug!("Registered session {}", session_id);
        conversation
    }

    /// Drop a session's conversation when its connection closes
    pub fn deregister(&self, session_id: SessionId) -> Option<SharedConversation> {
        let removed = self.storage.remove(&session_id).map(|(_, conv)| conv);
        if removed.is_some() {
            debug!("Deregistered session {}", session_id);
        }
        removed
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Registry statistics for monitoring
    pub fn stats(&self) -> RegistryStats {
        let total_turns = self
            .storage
            .iter()
            .map(|entry| entry.value().lock().len())
            .sum();

        RegistryStats {
            active_sessions: self.len(),
            total_turns,
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry statistics
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    pub active_sessions: usize,
    pub total_turns: usize,
}
