//! Base64 + image decoding with format detection, validation, and timeout support.
//!
//! Everything CPU-bound (decode, downscale, PNG encode) runs on the blocking
//! pool. The output is the upload-ready PNG for the captioning service.

use base64::Engine;
use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::AnalysisError;

/// Image decoder with configurable limits and timeout.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
pub struct DecodedImage {
    /// PNG upload for the captioning service, downscaled to fit
    /// `limits.caption_max_dimension`
    pub caption_png: Vec<u8>,
    /// Dimensions of the image encoded in `caption_png`
    pub caption_dimensions: (u32, u32),
    /// Detected source format
    pub format: ImageFormat,
    /// Source image width in pixels
    pub width: u32,
    /// Source image height in pixels
    pub height: u32,
    /// Size of the encoded image in bytes
    pub byte_len: u64,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode a base64 payload into an RGB pixel buffer.
    ///
    /// Accepts plain base64 or a `data:<mime>;base64,` URL. ASCII whitespace
    /// (line wrapping) is ignored.
    pub async fn decode_base64(&self, payload: &str) -> Result<DecodedImage, AnalysisError> {
        let bytes = decode_base64_payload(payload)?;
        self.decode_from_bytes(bytes).await
    }

    /// Decode an in-memory encoded image with validation and timeout.
    pub async fn decode_from_bytes(&self, bytes: Vec<u8>) -> Result<DecodedImage, AnalysisError> {
        let timeout_duration = Duration::from_millis(self.limits.decode_timeout_ms);
        let max_dim = self.limits.max_image_dimension;
        let caption_max = self.limits.caption_max_dimension;

        let decode_result = timeout(timeout_duration, async {
            tokio::task::spawn_blocking(move || Self::decode_bytes_sync(bytes, max_dim, caption_max))
                .await
        })
        .await;

        match decode_result {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(AnalysisError::Decode(format!("Task join error: {e}"))),
            Err(_) => Err(AnalysisError::Timeout {
                stage: "decode".to_string(),
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }

    /// Synchronous decode, validate, downscale and encode (runs in spawn_blocking).
    fn decode_bytes_sync(
        bytes: Vec<u8>,
        max_dim: u32,
        caption_max: u32,
    ) -> Result<DecodedImage, AnalysisError> {
        use std::io::Cursor;

        if bytes.is_empty() {
            return Err(AnalysisError::Decode("Empty image payload".to_string()));
        }

        let byte_len = bytes.len() as u64;
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| AnalysisError::Decode(format!("Cannot detect image format: {e}")))?;
        let format = reader.format().ok_or_else(|| {
            AnalysisError::Decode("Cannot identify image file: unknown format".to_string())
        })?;
        let image = reader
            .decode()
            .map_err(|e| AnalysisError::Decode(e.to_string()))?;

        let (width, height) = image.dimensions();
        if width > max_dim || height > max_dim {
            return Err(AnalysisError::ImageTooLarge {
                width,
                height,
                max_dim,
            });
        }

        let pixels = downscale(image, caption_max).to_rgb8();
        let caption_dimensions = pixels.dimensions();
        let caption_png = encode_png(&pixels)?;

        Ok(DecodedImage {
            caption_png,
            caption_dimensions,
            format,
            width,
            height,
            byte_len,
        })
    }
}

/// Shrink to fit within `max_side`, keeping the aspect ratio. Smaller images
/// pass through untouched.
fn downscale(image: DynamicImage, max_side: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width <= max_side && height <= max_side {
        image
    } else {
        image.thumbnail(max_side, max_side)
    }
}

/// Strip an optional data-URL header and whitespace, then base64-decode.
pub fn decode_base64_payload(payload: &str) -> Result<Vec<u8>, AnalysisError> {
    let trimmed = payload.trim();
    let encoded = match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| AnalysisError::Decode("Malformed data URL".to_string()))?,
        None => trimmed,
    };

    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| AnalysisError::Decode(format!("Invalid base64 payload: {e}")))
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        _ => "unknown".to_string(),
    }
}

/// Encode an RGB buffer as PNG bytes for upload to remote services.
fn encode_png(pixels: &RgbImage) -> Result<Vec<u8>, AnalysisError> {
    let mut buf = std::io::Cursor::new(Vec::new());
    pixels
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| AnalysisError::Decode(format!("Failed to encode PNG: {e}")))?;
    Ok(buf.into_inner())
}
