use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session identifier assigned at WebSocket upgrade
pub type SessionId = uuid::Uuid;

// ===== CONVERSATION MODELS =====

/// Speaker role, Gemini wire spelling ("user" / "model")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One text segment of a turn. Always a single segment in practice,
/// but kept as a sequence to match the provider's content shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPart {
    pub text: String,
}

/// One immutable exchange unit in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<TurnPart>,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![TurnPart { text: text.into() }],
            created_at: Utc::now(),
        }
    }

    /// Full text of the turn (segments joined)
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }
}

// ===== WIRE EVENT MODELS =====

/// Events received from the client over the WebSocket
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "kebab-case")]
pub enum ClientEvent {
    UserMessage { prompt: String },
}

/// Events emitted to the client over the WebSocket
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Reply text, verbatim as returned by the provider
    ModelReply(String),
    Error(ErrorInfo),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}
