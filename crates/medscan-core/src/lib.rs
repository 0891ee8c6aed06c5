//! Medscan Core - medical image analysis library.
//!
//! Takes a base64-encoded image and produces a structured analysis: a
//! caption, an image-type label, an LLM-written description, a severity score
//! and patient precautions.
//!
//! # Architecture
//!
//! ```text
//! base64 → Decode → Caption → Medical gate → Classify → LLM (description, precautions) → Severity → JSON
//! ```
//!
//! Captioning and text generation are delegated to external services behind
//! the [`caption::Captioner`] and [`llm::LlmProvider`] traits.
//!
//! # Usage
//!
//! ```rust,ignore
//! use medscan_core::{AnalysisRequest, Config, MedicalImageAnalyzer};
//!
//! #[tokio::main]
//! async fn main() -> medscan_core::Result<()> {
//!     let config = Config::load()?;
//!     let analyzer = MedicalImageAnalyzer::from_config(&config)?;
//!
//!     let request = AnalysisRequest { image: std::fs::read_to_string("scan.b64")? };
//!     let result = analyzer.analyze(&request).await?;
//!     println!("{} (severity {})", result.image_type, result.severity);
//!     Ok(())
//! }
//! ```

pub mod caption;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod types;

pub use config::Config;
pub use error::{AnalysisError, ConfigError, MedscanError, PipelineResult, Result};
pub use pipeline::MedicalImageAnalyzer;
pub use types::{AnalysisRequest, AnalysisResult, ImageType, Severity};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
