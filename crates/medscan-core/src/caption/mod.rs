//! Image captioning providers.
//!
//! A [`Captioner`] turns a PNG-encoded image into ranked caption candidates.
//! The analysis pipeline only consumes the top-ranked candidate.

pub(crate) mod huggingface;
pub(crate) mod ollama;

use async_trait::async_trait;
use std::time::Duration;

use crate::config::CaptioningConfig;
use crate::error::AnalysisError;
use crate::llm::resolve_env_var;

/// Trait that all captioning backends implement.
#[async_trait]
pub trait Captioner: Send + Sync {
    /// Provider name for logging (e.g., "huggingface").
    fn name(&self) -> &str;

    /// Caption a PNG image, returning candidates best-first.
    async fn caption(&self, png: &[u8]) -> Result<Vec<String>, AnalysisError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Factory that creates the configured captioning backend.
pub struct CaptionerFactory;

impl CaptionerFactory {
    /// Create the captioner named by `config.provider`.
    pub fn create(
        config: &CaptioningConfig,
        timeout: Duration,
    ) -> Result<Box<dyn Captioner>, AnalysisError> {
        match config.provider.as_str() {
            "huggingface" => {
                let cfg = config.huggingface.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    AnalysisError::Caption {
                        message: "HuggingFace API token not set. Set HF_API_TOKEN env var."
                            .to_string(),
                        status_code: None,
                    }
                })?;
                Ok(Box::new(huggingface::HuggingFaceCaptioner::new(
                    &cfg.endpoint,
                    &api_key,
                    &cfg.model,
                    timeout,
                )))
            }
            "ollama" => {
                let cfg = config.ollama.clone().unwrap_or_default();
                Ok(Box::new(ollama::OllamaCaptioner::new(
                    &cfg.endpoint,
                    &cfg.model,
                    timeout,
                )))
            }
            other => Err(AnalysisError::Caption {
                message: format!("Unknown captioning provider: {other}"),
                status_code: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HuggingFaceConfig;

    #[test]
    fn test_factory_huggingface_requires_token() {
        let config = CaptioningConfig {
            huggingface: Some(HuggingFaceConfig {
                api_key: "${MEDSCAN_TEST_UNSET_HF_TOKEN_555}".to_string(),
                ..HuggingFaceConfig::default()
            }),
            ..CaptioningConfig::default()
        };
        let err = CaptionerFactory::create(&config, Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(err.to_string().contains("HF_API_TOKEN"));
    }

    #[test]
    fn test_factory_huggingface_with_literal_token() {
        let config = CaptioningConfig {
            huggingface: Some(HuggingFaceConfig {
                api_key: "hf_literal".to_string(),
                ..HuggingFaceConfig::default()
            }),
            ..CaptioningConfig::default()
        };
        let captioner = CaptionerFactory::create(&config, Duration::from_secs(5)).unwrap();
        assert_eq!(captioner.name(), "huggingface");
    }

    #[test]
    fn test_factory_ollama() {
        let config = CaptioningConfig {
            provider: "ollama".to_string(),
            ..CaptioningConfig::default()
        };
        let captioner = CaptionerFactory::create(&config, Duration::from_secs(9)).unwrap();
        assert_eq!(captioner.name(), "ollama");
        assert_eq!(captioner.timeout(), Duration::from_secs(9));
    }
}
