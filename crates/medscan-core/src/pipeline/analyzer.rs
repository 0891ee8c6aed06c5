//! Pipeline orchestration - wires decode, caption, heuristics and LLM calls
//! into one analysis per request.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::caption::{Captioner, CaptionerFactory};
use crate::config::{AnalysisConfig, Config};
use crate::error::{AnalysisError, PipelineResult};
use crate::llm::prompts;
use crate::llm::{LlmProvider, LlmProviderFactory, LlmRequest};
use crate::types::{AnalysisRequest, AnalysisResult};

use super::classify::{classify_image_type, is_medical_caption};
use super::decode::{format_to_string, ImageDecoder};
use super::severity::{determine_severity, source_from_seed, SeveritySource};

/// Runs the full analysis for one image.
///
/// Holds the captioner, LLM provider and severity source for the life of the
/// process; none of them is mutated per request, so one instance serves all
/// requests concurrently.
pub struct MedicalImageAnalyzer {
    decoder: ImageDecoder,
    captioner: Box<dyn Captioner>,
    llm: Box<dyn LlmProvider>,
    severity: Box<dyn SeveritySource>,
    options: AnalysisConfig,
}

impl MedicalImageAnalyzer {
    /// Assemble an analyzer from explicit collaborators.
    pub fn new(
        config: &Config,
        captioner: Box<dyn Captioner>,
        llm: Box<dyn LlmProvider>,
    ) -> Self {
        Self {
            decoder: ImageDecoder::new(config.limits.clone()),
            captioner,
            llm,
            severity: source_from_seed(config.analysis.severity_seed),
            options: config.analysis.clone(),
        }
    }

    /// Build the configured captioner and LLM provider and assemble an analyzer.
    ///
    /// Fails when a provider is misconfigured (e.g. missing API key).
    pub fn from_config(config: &Config) -> PipelineResult<Self> {
        let captioner = CaptionerFactory::create(
            &config.captioning,
            Duration::from_millis(config.limits.caption_timeout_ms),
        )?;
        let llm = LlmProviderFactory::create(
            &config.llm,
            Duration::from_millis(config.limits.llm_timeout_ms),
        )?;
        tracing::info!(
            "Analyzer ready (captioner: {}, llm: {})",
            captioner.name(),
            llm.name()
        );
        Ok(Self::new(config, captioner, llm))
    }

    /// Replace the severity fallback source.
    pub fn with_severity_source(mut self, source: Box<dyn SeveritySource>) -> Self {
        self.severity = source;
        self
    }

    pub fn captioner_name(&self) -> &str {
        self.captioner.name()
    }

    pub fn llm_name(&self) -> &str {
        self.llm.name()
    }

    /// Whether the LLM provider reports itself configured and reachable.
    pub async fn llm_available(&self) -> bool {
        self.llm.is_available().await
    }

    /// Analyze a base64-encoded image request.
    pub async fn analyze(&self, request: &AnalysisRequest) -> PipelineResult<AnalysisResult> {
        let start = Instant::now();

        let decoded = self.decoder.decode_base64(&request.image).await?;
        tracing::debug!(
            "Decoded {} image {}x{} ({} bytes, caption upload {}x{}) in {:?}",
            format_to_string(decoded.format),
            decoded.width,
            decoded.height,
            decoded.byte_len,
            decoded.caption_dimensions.0,
            decoded.caption_dimensions.1,
            start.elapsed()
        );

        let result = self.analyze_image(&decoded.caption_png).await?;
        tracing::debug!("Analysis complete in {:?}", start.elapsed());
        Ok(result)
    }

    /// Analyze already-encoded image bytes (e.g. read from a file).
    pub async fn analyze_bytes(&self, bytes: Vec<u8>) -> PipelineResult<AnalysisResult> {
        let decoded = self.decoder.decode_from_bytes(bytes).await?;
        self.analyze_image(&decoded.caption_png).await
    }

    /// Caption a PNG-encoded image and analyze the caption.
    pub async fn analyze_image(&self, png: &[u8]) -> PipelineResult<AnalysisResult> {
        let caption_start = Instant::now();
        let candidates = with_timeout(
            "caption",
            self.captioner.timeout(),
            self.captioner.caption(png),
        )
        .await?;
        let caption = candidates
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::Caption {
                message: format!("{} returned no captions", self.captioner.name()),
                status_code: None,
            })?;
        tracing::debug!("Caption {:?} in {:?}", caption, caption_start.elapsed());

        self.analyze_caption(caption).await
    }

    /// Run the relevance gate, heuristics and LLM calls on a caption.
    pub async fn analyze_caption(&self, caption: String) -> PipelineResult<AnalysisResult> {
        if !is_medical_caption(&caption) {
            tracing::info!("Rejected non-medical caption: {:?}", caption);
            return Err(AnalysisError::NotMedical { caption });
        }

        let image_type = classify_image_type(&caption);
        tracing::debug!("Classified as {}", image_type);

        let enhanced_context = self
            .generate(prompts::enhanced_description_request(
                &caption,
                image_type,
                self.options.description_max_tokens,
            ))
            .await?;

        let precautions = self
            .generate(prompts::precautions_request(
                &caption,
                image_type,
                self.options.precautions_max_tokens,
            ))
            .await?;

        let severity = determine_severity(&caption, self.severity.as_ref());

        Ok(AnalysisResult {
            alt_text: caption,
            image_type,
            enhanced_context,
            severity,
            precautions,
        })
    }

    async fn generate(&self, mut request: LlmRequest) -> PipelineResult<String> {
        request.temperature = self.options.temperature;
        let response = with_timeout("llm", self.llm.timeout(), self.llm.generate(&request)).await?;
        tracing::trace!(
            "LLM {} answered in {}ms ({:?} tokens)",
            response.model,
            response.latency_ms,
            response.tokens_used
        );
        Ok(response.text.trim().to_string())
    }
}

async fn with_timeout<T>(
    stage: &str,
    limit: Duration,
    fut: impl Future<Output = PipelineResult<T>>,
) -> PipelineResult<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(AnalysisError::Timeout {
            stage: stage.to_string(),
            timeout_ms: limit.as_millis() as u64,
        }),
    }
}
