//! Error types for the MedScan analysis pipeline.
//!
//! Errors are organized by stage so the HTTP boundary can map each one to a
//! status code without inspecting message text.

use thiserror::Error;

/// Fixed user-facing message returned when the relevance gate rejects a caption.
pub const NOT_MEDICAL_MESSAGE: &str = "Upload a medical-related image.";

/// Top-level error type for MedScan operations.
#[derive(Error, Debug)]
pub enum MedscanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Analysis pipeline errors
    #[error("{0}")]
    Analysis(#[from] AnalysisError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Analysis errors, organized by pipeline stage.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The request body could not be read as an analysis request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Base64 or image decoding failed
    #[error("Decode error: {0}")]
    Decode(String),

    /// Decoded image exceeds the configured dimension limit
    #[error("Image too large: {width}x{height} > {max_dim}")]
    ImageTooLarge {
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// The caption does not describe a medical image
    #[error("{}", NOT_MEDICAL_MESSAGE)]
    NotMedical { caption: String },

    /// Captioning service call failed
    #[error("Captioning error: {message}")]
    Caption {
        message: String,
        /// HTTP status code from the captioning API, if available
        status_code: Option<u16>,
    },

    /// LLM text generation failed
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        /// HTTP status code from the LLM API, if available
        status_code: Option<u16>,
    },

    /// Operation timed out
    #[error("Timeout in {stage} stage after {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },
}

impl AnalysisError {
    /// Whether the failure was caused by the caller's input rather than by
    /// this service or one of its upstreams.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AnalysisError::NotMedical { .. })
    }
}

/// Convenience type alias for MedScan results.
pub type Result<T> = std::result::Result<T, MedscanError>;

/// Convenience type alias for analysis-specific results.
pub type PipelineResult<T> = std::result::Result<T, AnalysisError>;
