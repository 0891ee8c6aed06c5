//! Core data types for the MedScan analysis pipeline.
//!
//! The request and result types double as the HTTP wire format, so their
//! serde names are part of the public contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inbound analysis request: a single base64-encoded image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Base64 image bytes, optionally prefixed with a `data:` URL header
    pub image: String,
}

/// The complete output for an analyzed image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Caption produced by the captioning service
    pub alt_text: String,

    /// Heuristic classification of the caption
    pub image_type: ImageType,

    /// LLM-generated enhanced medical description
    pub enhanced_context: String,

    /// Heuristic severity estimate
    pub severity: Severity,

    /// LLM-generated patient precautions
    pub precautions: String,
}

/// Medical image category, serialized as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageType {
    #[serde(rename = "X-ray")]
    XRay,
    #[serde(rename = "MRI (Brain Tumor Detection)")]
    Mri,
    #[serde(rename = "Ultrasound (Pregnancy Detection)")]
    Ultrasound,
    #[serde(rename = "Mammogram (Breast Cancer Detection)")]
    Mammogram,
    #[serde(rename = "X-ray (Fracture Detection)")]
    Fracture,
    #[serde(rename = "General Medical Image")]
    General,
}

impl ImageType {
    /// Human-readable label, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            ImageType::XRay => "X-ray",
            ImageType::Mri => "MRI (Brain Tumor Detection)",
            ImageType::Ultrasound => "Ultrasound (Pregnancy Detection)",
            ImageType::Mammogram => "Mammogram (Breast Cancer Detection)",
            ImageType::Fracture => "X-ray (Fracture Detection)",
            ImageType::General => "General Medical Image",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Heuristic severity score in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Severity(u8);

impl Severity {
    pub const MAX: u8 = 100;

    /// Create a severity score, clamping to the valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serializes_camel_case() {
        let result = AnalysisResult {
            alt_text: "an x-ray of a hand".to_string(),
            image_type: ImageType::XRay,
            enhanced_context: "context".to_string(),
            severity: Severity::new(20),
            precautions: "rest".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["altText"], "an x-ray of a hand");
        assert_eq!(json["imageType"], "X-ray");
        assert_eq!(json["enhancedContext"], "context");
        assert_eq!(json["severity"], 20);
        assert_eq!(json["precautions"], "rest");
    }

    #[test]
    fn test_image_type_serde_matches_label() {
        for ty in [
            ImageType::XRay,
            ImageType::Mri,
            ImageType::Ultrasound,
            ImageType::Mammogram,
            ImageType::Fracture,
            ImageType::General,
        ] {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.label()));
        }
    }

    #[test]
    fn test_severity_clamped() {
        assert_eq!(Severity::new(250).value(), 100);
        assert_eq!(Severity::new(42).value(), 42);
    }

    #[test]
    fn test_request_deserializes() {
        let req: AnalysisRequest = serde_json::from_str(r#"{"image":"aGVsbG8="}"#).unwrap();
        assert_eq!(req.image, "aGVsbG8=");
    }
}
