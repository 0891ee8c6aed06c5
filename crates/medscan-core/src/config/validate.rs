//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

const CAPTIONING_PROVIDERS: &[&str] = &["huggingface", "ollama"];
const LLM_PROVIDERS: &[&str] = &["openai", "anthropic", "ollama"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        if self.limits.max_payload_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_payload_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.caption_max_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.caption_max_dimension must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.caption_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.caption_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.llm_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.llm_timeout_ms must be > 0".into(),
            ));
        }
        if self.analysis.description_max_tokens == 0 || self.analysis.precautions_max_tokens == 0
        {
            return Err(ConfigError::ValidationError(
                "analysis token caps must be > 0".into(),
            ));
        }
        if let Some(t) = self.analysis.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::ValidationError(format!(
                    "analysis.temperature must be within 0.0..=2.0, got {t}"
                )));
            }
        }
        if !CAPTIONING_PROVIDERS.contains(&self.captioning.provider.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "captioning.provider must be one of {CAPTIONING_PROVIDERS:?}, got '{}'",
                self.captioning.provider
            )));
        }
        if !LLM_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "llm.provider must be one of {LLM_PROVIDERS:?}, got '{}'",
                self.llm.provider
            )));
        }
        Ok(())
    }
}
