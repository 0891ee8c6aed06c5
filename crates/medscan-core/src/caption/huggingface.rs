//! HuggingFace Inference API captioner (image-to-text task).
//!
//! Uploads the PNG bytes to `{endpoint}/{model}`; the API answers with
//! `[{"generated_text": "..."}]`.

use super::Captioner;
use crate::error::AnalysisError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Captioner backed by a hosted image-to-text model.
pub struct HuggingFaceCaptioner {
    url: String,
    api_key: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HuggingFaceCaptioner {
    pub fn new(endpoint: &str, api_key: &str, model: &str, timeout: Duration) -> Self {
        Self {
            url: format!("{}/{}", endpoint.trim_end_matches('/'), model),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// The API returns either a ranked list or, for some deployments, a bare object.
#[derive(Deserialize)]
#[serde(untagged)]
enum CaptionResponse {
    Many(Vec<GeneratedText>),
    One(GeneratedText),
}

impl CaptionResponse {
    fn into_captions(self) -> Vec<String> {
        match self {
            CaptionResponse::Many(items) => items.into_iter().map(|g| g.generated_text).collect(),
            CaptionResponse::One(item) => vec![item.generated_text],
        }
    }
}

#[async_trait]
impl Captioner for HuggingFaceCaptioner {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn caption(&self, png: &[u8]) -> Result<Vec<String>, AnalysisError> {
        let start = Instant::now();

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "image/png")
            .body(png.to_vec())
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| AnalysisError::Caption {
                message: format!("HuggingFace request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::Caption {
                message: format!("HuggingFace HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let parsed: CaptionResponse = resp.json().await.map_err(|e| AnalysisError::Caption {
            message: format!("Failed to parse HuggingFace response: {e}"),
            status_code: None,
        })?;

        let captions = parsed.into_captions();
        tracing::trace!(
            "HuggingFace returned {} caption(s) in {:?}",
            captions.len(),
            start.elapsed()
        );
        Ok(captions)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
