//! Fixed prompt templates for the two text-generation calls.

use super::provider::LlmRequest;
use crate::types::ImageType;

/// Prompt asking for an enhanced radiological description.
pub fn enhanced_description(caption: &str, image_type: ImageType) -> String {
    format!(
        "Given the medical image caption: \"{caption}\" and image type: \"{image_type}\",\n\
         provide an enhanced medical description. Include any notable abnormalities,\n\
         medical concerns, and potential diagnoses a radiologist might consider."
    )
}

/// Prompt asking for patient precautions.
pub fn precautions(caption: &str, image_type: ImageType) -> String {
    format!(
        "Given the medical image caption: \"{caption}\" and image type: \"{image_type}\",\n\
         suggest important precautions a patient should take. Include home remedies,\n\
         necessary medical consultation, and lifestyle changes if required."
    )
}

/// Single system-message request for the enhanced description.
pub fn enhanced_description_request(
    caption: &str,
    image_type: ImageType,
    max_tokens: u32,
) -> LlmRequest {
    LlmRequest::system_prompt(enhanced_description(caption, image_type), max_tokens)
}

/// Single system-message request for the precautions.
pub fn precautions_request(caption: &str, image_type: ImageType, max_tokens: u32) -> LlmRequest {
    LlmRequest::system_prompt(precautions(caption, image_type), max_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_prompt_embeds_caption_and_type() {
        let prompt = enhanced_description("an x-ray of a hand", ImageType::XRay);
        assert!(prompt.contains("caption: \"an x-ray of a hand\""));
        assert!(prompt.contains("image type: \"X-ray\""));
        assert!(prompt.contains("radiologist"));
    }

    #[test]
    fn test_precautions_prompt_differs() {
        let a = enhanced_description("c", ImageType::General);
        let b = precautions("c", ImageType::General);
        assert_ne!(a, b);
        assert!(b.contains("home remedies"));
        assert!(b.contains("\"General Medical Image\""));
    }

    #[test]
    fn test_requests_carry_token_caps() {
        let req = enhanced_description_request("c", ImageType::Mri, 200);
        assert_eq!(req.max_tokens, 200);
        let req = precautions_request("c", ImageType::Mri, 150);
        assert_eq!(req.max_tokens, 150);
        assert_eq!(req.messages.len(), 1);
    }
}
