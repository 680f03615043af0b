use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::chat::Turn;

/// Conversation handle shared between the connection task and the relay.
/// The lock is only held for append/snapshot, never across an await.
pub type SharedConversation = Arc<Mutex<Conversation>>;

/// Ordered, append-only sequence of turns for one connection.
/// Created empty on connect, dropped on disconnect; never truncated.
#[derive(Debug, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedConversation {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Add a turn at the end. Turns are immutable once appended.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Full ordered history as of this call, used as the provider
    /// prompt context.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
