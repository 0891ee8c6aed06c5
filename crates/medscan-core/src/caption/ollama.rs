//! Ollama captioner using a local vision model (e.g. llava).

use super::Captioner;
use crate::error::AnalysisError;
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CAPTION_PROMPT: &str = "Write a single short sentence describing this image, \
    as an image caption. Name the imaging modality if it is a medical image.";

/// Caption length cap; captions are one sentence.
const CAPTION_MAX_TOKENS: u32 = 60;

/// Captioner backed by a local Ollama vision model.
pub struct OllamaCaptioner {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl OllamaCaptioner {
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

/// Ollama /api/generate request body.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    images: Vec<String>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama /api/generate response.
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl Captioner for OllamaCaptioner {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn caption(&self, png: &[u8]) -> Result<Vec<String>, AnalysisError> {
        let url = format!("{}/api/generate", self.endpoint);

        let body = GenerateRequest {
            model: &self.model,
            prompt: CAPTION_PROMPT,
            images: vec![base64::engine::general_purpose::STANDARD.encode(png)],
            stream: false,
            options: GenerateOptions {
                temperature: 0.0,
                num_predict: CAPTION_MAX_TOKENS,
            },
        };

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| AnalysisError::Caption {
                message: format!("Ollama request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::Caption {
                message: format!("Ollama HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let generated: GenerateResponse = resp.json().await.map_err(|e| AnalysisError::Caption {
            message: format!("Failed to parse Ollama response: {e}"),
            status_code: None,
        })?;

        let caption = generated.response.trim();
        if caption.is_empty() {
            return Ok(vec![]);
        }
        Ok(vec![caption.to_string()])
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
