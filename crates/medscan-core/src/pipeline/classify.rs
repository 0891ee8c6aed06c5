//! Keyword heuristics over captions: the medical-relevance gate and the
//! image-type cascade.
//!
//! All matching is case-insensitive substring matching against the caption.

use crate::types::ImageType;

/// Terms that mark a caption as medically relevant. Any match passes the gate.
pub const MEDICAL_KEYWORDS: &[&str] = &[
    "x-ray",
    "mri",
    "ultrasound",
    "fetus",
    "pregnancy",
    "breast cancer",
    "mammogram",
    "fracture",
    "bone",
    "tumor",
    "cancer",
    "radiology",
    "breast",
    "brain",
    "rash",
];

/// Image-type rules in priority order. The first rule with any matching
/// keyword wins, so "x-ray ... mri" is an X-ray.
const IMAGE_TYPE_RULES: &[(&[&str], ImageType)] = &[
    (&["x-ray"], ImageType::XRay),
    (&["mri", "brain scan"], ImageType::Mri),
    (&["ultrasound", "fetus", "pregnancy"], ImageType::Ultrasound),
    (&["breast cancer", "mammogram"], ImageType::Mammogram),
    (&["fracture", "bone"], ImageType::Fracture),
];

/// Whether the caption mentions any medical term.
pub fn is_medical_caption(caption: &str) -> bool {
    let caption = caption.to_lowercase();
    MEDICAL_KEYWORDS.iter().any(|kw| caption.contains(kw))
}

/// Classify a caption into an image type.
pub fn classify_image_type(caption: &str) -> ImageType {
    let caption = caption.to_lowercase();
    IMAGE_TYPE_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| caption.contains(kw)))
        .map(|(_, ty)| *ty)
        .unwrap_or(ImageType::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_rejects_non_medical() {
        assert!(!is_medical_caption("a dog running on the beach"));
        assert!(!is_medical_caption(""));
    }

    #[test]
    fn test_gate_is_case_insensitive() {
        assert!(is_medical_caption("An X-RAY of a chest"));
        assert!(is_medical_caption("close up of a skin Rash"));
    }

    #[test]
    fn test_gate_matches_substrings() {
        // Substring, not word, matching: "trombone" contains "bone".
        assert!(is_medical_caption("a man playing the trombone"));
        assert!(is_medical_caption("a sketch of the human brain"));
    }

    #[test]
    fn test_xray_wins_over_mri() {
        assert_eq!(classify_image_type("x-ray and mri of the skull"), ImageType::XRay);
    }

    #[test]
    fn test_brain_scan_is_mri() {
        assert_eq!(classify_image_type("a brain scan of a patient"), ImageType::Mri);
    }

    #[test]
    fn test_ultrasound_keywords() {
        assert_eq!(classify_image_type("ultrasound image"), ImageType::Ultrasound);
        assert_eq!(classify_image_type("a fetus in the womb"), ImageType::Ultrasound);
        assert_eq!(classify_image_type("Pregnancy test result"), ImageType::Ultrasound);
    }

    #[test]
    fn test_mammogram_keywords() {
        assert_eq!(classify_image_type("a mammogram scan"), ImageType::Mammogram);
        assert_eq!(
            classify_image_type("breast cancer awareness poster"),
            ImageType::Mammogram
        );
    }

    #[test]
    fn test_fracture_after_xray() {
        assert_eq!(
            classify_image_type("x-ray shows mild fracture of the wrist"),
            ImageType::XRay
        );
        assert_eq!(classify_image_type("a broken bone"), ImageType::Fracture);
    }

    #[test]
    fn test_fallback_general() {
        assert_eq!(classify_image_type("a skin rash on an arm"), ImageType::General);
        assert_eq!(classify_image_type("a tumor"), ImageType::General);
    }
}
