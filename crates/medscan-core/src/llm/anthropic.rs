//! Anthropic LLM provider using the Messages API.
//!
//! The Messages API has no system role inside `messages`; system prompts go in
//! the top-level `system` field and at least one user turn is required.

use super::provider::{ChatMessage, LlmProvider, LlmRequest, LlmResponse, Role};
use crate::error::AnalysisError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Anthropic provider using the Messages API.
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl AnthropicProvider {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl MessagesRequest {
    /// Split system messages out of the conversation.
    ///
    /// A system-only conversation is sent as a single user turn instead.
    fn from_request(model: &str, request: &LlmRequest) -> Self {
        let (system, turns): (Vec<&ChatMessage>, Vec<&ChatMessage>) = request
            .messages
            .iter()
            .partition(|m| m.role == Role::System);

        let system_text = system
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let (system, messages) = if turns.is_empty() {
            (None, vec![ChatMessage::user(system_text)])
        } else {
            let system = (!system_text.is_empty()).then_some(system_text);
            (system, turns.into_iter().cloned().collect())
        };

        Self {
            model: model.to_string(),
            max_tokens: request.max_tokens,
            system,
            messages,
            temperature: request.temperature,
        }
    }
}

// --- Response types ---

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseContent>,
    model: String,
    usage: Usage,
}

impl MessagesResponse {
    /// Concatenated text blocks, trimmed. An empty completion is returned as-is.
    fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| c.text.as_deref())
            .collect::<String>()
            .trim()
            .to_string()
    }
}

#[derive(Deserialize)]
struct ResponseContent {
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, AnalysisError> {
        let start = Instant::now();
        let body = MessagesRequest::from_request(&self.model, request);

        let resp = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| AnalysisError::Llm {
                message: format!("Anthropic request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::Llm {
                message: format!("Anthropic HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let messages_resp: MessagesResponse =
            resp.json().await.map_err(|e| AnalysisError::Llm {
                message: format!("Failed to parse Anthropic response: {e}"),
                status_code: None,
            })?;

        let text = messages_resp.text();
        Ok(LlmResponse {
            text,
            model: messages_resp.model,
            tokens_used: Some(messages_resp.usage.input_tokens + messages_resp.usage.output_tokens),
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
    fn test_system_only_request_becomes_user_turn() {
        let request = LlmRequest::system_prompt("Explain the scan.", 200);
        let body = MessagesRequest::from_request("claude", &request);
        assert!(body.system.is_none());
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].role, Role::User);
        assert_eq!(body.messages[0].content, "Explain the scan.");
        assert_eq!(body.max_tokens, 200);
    }

    #[test]
    fn test_system_split_from_turns() {
        let request = LlmRequest {
            messages: vec![
                ChatMessage::system("You are a radiologist."),
                ChatMessage::user("Describe this."),
            ],
            max_tokens: 100,
            temperature: Some(0.2),
        };
        let body = MessagesRequest::from_request("claude", &request);
        assert_eq!(body.system.as_deref(), Some("You are a radiologist."));
        assert_eq!(body.messages.len(), 1);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["system"], "You are a radiologist.");
    }

    #[test]
    fn test_empty_completion_is_empty_text() {
        let raw = r#"{"model":"claude","content":[],"usage":{"input_tokens":5,"output_tokens":0}}"#;
        let resp: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.text(), "");

        let raw = r#"{"model":"claude","content":[{"type":"text","text":" a "},{"type":"text","text":"b "}],"usage":{"input_tokens":5,"output_tokens":2}}"#;
        let resp: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.text(), "a b");
    }
}
