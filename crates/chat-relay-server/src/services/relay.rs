use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::ChatConfig;
use crate::models::chat::{SessionId, Turn};
use crate::utils::error::{ApiError, ProviderError};

use super::conversation::SharedConversation;

/// Trait for the completion provider
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, history: &[Turn]) -> Result<String, ProviderError>;
}

/// Orchestrates one request/response cycle per inbound user message:
/// validate, append the user turn, call the provider with the full
/// history, append the reply as a model turn.
pub struct RelayService {
    provider: Arc<dyn CompletionProvider>,
    max_prompt_chars: usize,
}

impl RelayService {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: ChatConfig) -> Self {
        Self {
            provider,
            max_prompt_chars: config.max_prompt_chars,
        }
    }

    /// Run one relay cycle. On provider failure nothing is rolled back:
    /// the conversation keeps the unanswered user turn and no model turn
    /// is appended, so the caller can emit an explicit error event.
    pub async fn handle_user_message(
        &self,
        session_id: SessionId,
        conversation: &SharedConversation,
        prompt: &str,
    ) -> Result<String, ApiError> {
        if prompt.trim().is_empty() {
            warn!(%session_id, "Rejected empty prompt");
            return Err(ApiError::EmptyPrompt);
        }
        if prompt.chars().count() > self.max_prompt_chars {
            warn!(
                %session_id,
                prompt_chars = prompt.chars().count(),
                "Rejected oversized prompt"
            );
            return Err(ApiError::PromptTooLong {
                max: self.max_prompt_chars,
            });
        }

        conversation.lock().append(Turn::user(prompt));
        let history = conversation.lock().snapshot();

        debug!(
            %session_id,
            history_len = history.len(),
            prompt_len = prompt.len(),
            "Calling completion provider"
        );

        let started = Instant::now();
        let reply = self.provider.complete(&history).await.map_err(|e| {
            warn!(%session_id, error = %e, "Provider call failed");
            e
        })?;

        conversation.lock().append(Turn::model(reply.clone()));

        info!(
            %session_id,
            turns = conversation.lock().len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Model reply relayed"
        );

        Ok(reply)
    }
}
