use thiserror::Error;

use crate::models::chat::ErrorInfo;

/// Completion provider failure taxonomy. Never retried; every variant
/// surfaces to the relay and becomes an error event for the client.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Gemini network error: {0}")]
    Network(String),

    #[error("Gemini rate limited")]
    RateLimited,

    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed Gemini reply: {0}")]
    MalformedReply(String),
}

/// Errors produced by one relay cycle
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Empty prompt")]
    EmptyPrompt,

    #[error("Prompt exceeds {max} characters")]
    PromptTooLong { max: usize },

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl ApiError {
    /// Wire error payload for the originating connection
    pub fn to_error_info(&self) -> ErrorInfo {
        let code = match self {
            ApiError::EmptyPrompt => "EMPTY_PROMPT",
            ApiError::PromptTooLong { .. } => "PROMPT_TOO_LONG",
            ApiError::Provider(ProviderError::RateLimited) => "PROVIDER_RATE_LIMITED",
            ApiError::Provider(_) => "PROVIDER_ERROR",
        };

        ErrorInfo {
            code: code.to_string(),
            message: self.to_string(),
        }
    }
}
