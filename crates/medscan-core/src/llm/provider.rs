//! LLM provider trait and request/response types.
//!
//! Defines the interface that all LLM providers implement, plus the
//! factory that creates the right provider from config.

use crate::config::LlmConfig;
use crate::error::AnalysisError;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged message in a chat request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A single-turn text generation request.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Conversation to complete
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,
}

impl LlmRequest {
    /// Build a request consisting of one system-role message.
    pub fn system_prompt(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            messages: vec![ChatMessage::system(prompt)],
            max_tokens,
            temperature: None,
        }
    }
}

/// The response from an LLM call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Text of the top-ranked choice, whitespace-trimmed
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the analyzer holds a `Box<dyn LlmProvider>` shared across requests).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "openai", "ollama").
    fn name(&self) -> &str;

    /// Check whether the provider is configured and reachable.
    async fn is_available(&self) -> bool;

    /// Generate a completion for the given request.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, AnalysisError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Factory that creates the configured provider.
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create the LLM provider named by `config.provider`.
    ///
    /// Fails when the provider is unknown or its API key cannot be resolved,
    /// so a misconfigured service refuses to start instead of failing per request.
    pub fn create(
        config: &LlmConfig,
        timeout: Duration,
    ) -> Result<Box<dyn LlmProvider>, AnalysisError> {
        match config.provider.as_str() {
            "openai" => {
                let cfg = config.openai.clone().unwrap_or_default();
                let api_key = require_key(&cfg.api_key, "OpenAI", "OPENAI_API_KEY")?;
                Ok(Box::new(super::openai::OpenAiProvider::new(
                    &cfg.endpoint,
                    &api_key,
                    &cfg.model,
                    timeout,
                )))
            }
            "anthropic" => {
                let cfg = config.anthropic.clone().unwrap_or_default();
                let api_key = require_key(&cfg.api_key, "Anthropic", "ANTHROPIC_API_KEY")?;
                Ok(Box::new(super::anthropic::AnthropicProvider::new(
                    &api_key, &cfg.model, timeout,
                )))
            }
            "ollama" => {
                let cfg = config.ollama.clone().unwrap_or_default();
                Ok(Box::new(super::ollama::OllamaProvider::new(
                    &cfg.endpoint,
                    &cfg.model,
                    timeout,
                )))
            }
            other => Err(AnalysisError::Llm {
                message: format!("Unknown LLM provider: {other}"),
                status_code: None,
            }),
        }
    }
}

fn require_key(raw: &str, provider: &str, env_var: &str) -> Result<String, AnalysisError> {
    resolve_env_var(raw).ok_or_else(|| AnalysisError::Llm {
        message: format!("{provider} API key not set. Set {env_var} env var."),
        status_code: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpenAiConfig;

    #[test]
    fn test_system_prompt_request() {
        let request = LlmRequest::system_prompt("Describe.", 200);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, "Describe.");
        assert_eq!(request.max_tokens, 200);
        assert!(request.temperature.is_none());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("x")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "x");
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_factory_fails_fast_without_key() {
        let config = LlmConfig {
            openai: Some(OpenAiConfig {
                api_key: "${MEDSCAN_TEST_UNSET_KEY_987}".to_string(),
                ..OpenAiConfig::default()
            }),
            ..LlmConfig::default()
        };
        let err = LlmProviderFactory::create(&config, Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_factory_literal_key() {
        let config = LlmConfig {
            openai: Some(OpenAiConfig {
                api_key: "sk-literal".to_string(),
                ..OpenAiConfig::default()
            }),
            ..LlmConfig::default()
        };
        let provider = LlmProviderFactory::create(&config, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_factory_ollama_needs_no_key() {
        let config = LlmConfig {
            provider: "ollama".to_string(),
            ..LlmConfig::default()
        };
        let provider = LlmProviderFactory::create(&config, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_factory_unknown_provider() {
        let config = LlmConfig {
            provider: "nope".to_string(),
            ..LlmConfig::default()
        };
        assert!(LlmProviderFactory::create(&config, Duration::from_secs(5)).is_err());
    }
}
