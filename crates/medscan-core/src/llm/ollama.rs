//! Ollama LLM provider for local text generation.
//!
//! Talks to a local Ollama instance via its `/api/chat` endpoint.
//! No authentication required, just needs Ollama running locally.

use super::provider::{ChatMessage, LlmProvider, LlmRequest, LlmResponse};
use crate::error::AnalysisError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Ollama provider for local chat models.
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl OllamaProvider {
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

/// Ollama /api/chat request body.
#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    num_predict: u32,
}

/// Ollama /api/chat response.
#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    content: String,
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.endpoint);
        match self.client.get(&url).timeout(Duration::from_secs(5)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, AnalysisError> {
        let url = format!("{}/api/chat", self.endpoint);
        let start = Instant::now();

        let body = OllamaChatRequest {
            model: &self.model,
            messages: &request.messages,
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| AnalysisError::Llm {
                message: format!("Ollama request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::Llm {
                message: format!("Ollama HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_resp: OllamaChatResponse =
            resp.json().await.map_err(|e| AnalysisError::Llm {
                message: format!("Failed to parse Ollama response: {e}"),
                status_code: None,
            })?;

        let text = chat_resp.message.content.trim().to_string();

        let tokens_used = match (chat_resp.prompt_eval_count, chat_resp.eval_count) {
            (None, None) => None,
            (p, e) => Some(p.unwrap_or(0) + e.unwrap_or(0)),
        };

        Ok(LlmResponse {
            text,
            model: self.model.clone(),
            tokens_used,
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
    fn test_chat_request_shape() {
        let messages = vec![ChatMessage::system("prompt")];
        let body = OllamaChatRequest {
            model: "llama3.1",
            messages: &messages,
            stream: false,
            options: OllamaOptions {
                temperature: None,
                num_predict: 150,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 150);
        assert_eq!(json["messages"][0]["role"], "system");
    }

    #[test]
    fn test_chat_response_without_counts() {
        let raw = r#"{"model":"llama3.1","message":{"role":"assistant","content":" hi "},"done":true}"#;
        let resp: OllamaChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.message.content, " hi ");
        assert!(resp.eval_count.is_none());
    }

    #[test]
    fn test_empty_completion_parses() {
        let raw = r#"{"model":"llama3.1","message":{"role":"assistant","content":""},"done":true}"#;
        let resp: OllamaChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.message.content.trim(), "");
    }
}
