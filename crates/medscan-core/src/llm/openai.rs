//! OpenAI LLM provider using the Chat Completions API.
//!
//! Works against any OpenAI-compatible endpoint (Hyperbolic, vLLM, LiteLLM).

use super::provider::{ChatMessage, LlmProvider, LlmRequest, LlmResponse};
use crate::error::AnalysisError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// OpenAI provider using Chat Completions API.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl OpenAiProvider {
    /// Create a provider for the API rooted at `base_url` (e.g. `https://api.openai.com/v1`).
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            timeout,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: String,
    usage: Option<ChatUsage>,
}

impl ChatResponse {
    /// Text of the first choice, trimmed. A null or empty completion becomes
    /// an empty string; only a missing choice is an error.
    fn first_choice_text(&self) -> Result<String, AnalysisError> {
        let choice = self.choices.first().ok_or_else(|| AnalysisError::Llm {
            message: "OpenAI returned empty choices array, no content generated".to_string(),
            status_code: None,
        })?;
        Ok(choice
            .message
            .content
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, AnalysisError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| AnalysisError::Llm {
                message: format!("OpenAI request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::Llm {
                message: format!("OpenAI HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| AnalysisError::Llm {
            message: format!("Failed to parse OpenAI response: {e}"),
            status_code: None,
        })?;

        let text = chat_resp.first_choice_text()?;

        Ok(LlmResponse {
            text,
            model: chat_resp.model,
            tokens_used: chat_resp.usage.map(|u| u.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let provider = OpenAiProvider::new(
            "https://api.hyperbolic.xyz/v1/",
            "key",
            "model",
            Duration::from_secs(1),
        );
        assert_eq!(
            provider.endpoint,
            "https://api.hyperbolic.xyz/v1/chat/completions"
        );
    }

    #[test]
    fn test_chat_request_shape() {
        let messages = vec![ChatMessage::system("prompt")];
        let body = ChatRequest {
            model: "gpt-4",
            messages: &messages,
            max_tokens: 150,
            temperature: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["max_tokens"], 150);
        assert_eq!(json["messages"][0]["role"], "system");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_chat_response_parses_first_choice() {
        let raw = r#"{
            "model": "gpt-4-0613",
            "choices": [
                {"message": {"role": "assistant", "content": "  first  "}},
                {"message": {"role": "assistant", "content": "second"}}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;
        let resp: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.first_choice_text().unwrap(), "first");
        assert_eq!(resp.usage.map(|u| u.total_tokens), Some(15));
    }

    #[test]
    fn test_empty_completion_is_empty_text() {
        let raw = r#"{"choices": [{"message": {"role": "assistant", "content": ""}}]}"#;
        let resp: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.first_choice_text().unwrap(), "");

        let raw = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let resp: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.first_choice_text().unwrap(), "");
    }

    #[test]
    fn test_missing_choice_is_error() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(resp.first_choice_text().is_err());
    }
}
