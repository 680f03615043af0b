use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeminiConfig;
use crate::models::chat::{Role, Turn, TurnPart};
use crate::utils::error::ProviderError;

use super::relay::CompletionProvider;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini `generateContent` client
#[derive(Clone)]
pub struct GeminiService {
    client: Client,
    config: GeminiConfig,
}

// Request structures

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<WireContent>,
    generation_config: WireGenerationConfig,
}

#[derive(Debug, Serialize)]
struct WireContent {
    role: Role,
    parts: Vec<TurnPart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

// Response structures

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiService {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(config.timeout_seconds))
                .build()
                .unwrap_or_else(|_| Client::new()),
            config,
        }
    }

    fn api_url(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.config.model)
    }

    fn build_request(&self, history: &[Turn]) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: history
                .iter()
                .map(|turn| WireContent {
                    role: turn.role,
                    parts: turn.parts.clone(),
                })
                .collect(),
            generation_config: WireGenerationConfig {
                max_output_tokens: self.config.max_output_tokens,
                temperature: self.config.temperature,
            },
        }
    }

    /// Concatenate the text parts of the first candidate
    fn parse_reply(body: GenerateContentResponse) -> Result<String, ProviderError> {
        let candidate = body
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::MalformedReply("no candidates".to_string()))?;

        let reply: String = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if reply.is_empty() {
            return Err(ProviderError::MalformedReply(
                "candidate carried no text".to_string(),
            ));
        }

        Ok(reply)
    }
}

#[async_trait::async_trait]
impl CompletionProvider for GeminiService {
    async fn complete(&self, history: &[Turn]) -> Result<String, ProviderError> {
        let request = self.build_request(history);

        debug!(
            model = %self.config.model,
            contents = request.contents.len(),
            "Gemini generateContent request"
        );

        let response = self
            .client
            .post(self.api_url())
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedReply(e.to_string()))?;

        Self::parse_reply(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> GeminiService {
        GeminiService::new(GeminiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-2.0-flash".to_string(),
            max_output_tokens: 1024,
            temperature: 0.7,
            timeout_seconds: 60,
        })
    }

    #[test]
    fn test_api_url_targets_generate_content() {
        assert_eq!(
            service().api_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_wire_format() {
        let history = vec![Turn::user("Hello"), Turn::model("Hi there!")];
        let body = serde_json::to_value(service().build_request(&history)).unwrap();

        assert_eq!(
            body["contents"],
            serde_json::json!([
                { "role": "user", "parts": [{ "text": "Hello" }] },
                { "role": "model", "parts": [{ "text": "Hi there!" }] },
            ])
        );
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
    }

    #[test]
    fn test_parse_reply_single_part() {
        let body: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "Hi there!" }] } }
            ],
            "usageMetadata": { "promptTokenCount": 3 }
        }))
        .unwrap();

        assert_eq!(GeminiService::parse_reply(body).unwrap(), "Hi there!");
    }

    #[test]
    fn test_parse_reply_concatenates_parts() {
        let body: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "Hi " }, { "text": "there!" }] } }
            ]
        }))
        .unwrap();

        assert_eq!(GeminiService::parse_reply(body).unwrap(), "Hi there!");
    }

    #[test]
    fn test_parse_reply_rejects_empty_candidates() {
        let body: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();
        assert!(matches!(
            GeminiService::parse_reply(body),
            Err(ProviderError::MalformedReply(_))
        ));

        let body: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(matches!(
            GeminiService::parse_reply(body),
            Err(ProviderError::MalformedReply(_))
        ));
    }

    #[test]
    fn test_parse_reply_rejects_textless_candidate() {
        let body: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [] } }]
        }))
        .unwrap();

        assert!(matches!(
            GeminiService::parse_reply(body),
            Err(ProviderError::MalformedReply(_))
        ));
    }
}
