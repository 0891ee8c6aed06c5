//! Analysis pipeline components.
//!
//! - **decode**: base64 payload to RGB pixels, with size and time limits
//! - **classify**: caption relevance gate and image-type cascade
//! - **severity**: keyword severity with a random fallback
//! - **analyzer**: orchestrates the full analysis

pub mod analyzer;
pub mod classify;
pub mod decode;
pub mod severity;

pub use analyzer::MedicalImageAnalyzer;
pub use classify::{classify_image_type, is_medical_caption, MEDICAL_KEYWORDS};
pub use decode::{DecodedImage, ImageDecoder};
pub use severity::{determine_severity, SeededSource, SeveritySource, ThreadRngSource};
