//! OCR client trait and request payload types.
//!
//! Defines the capability every extraction backend implements. Only the
//! Gemini backend ships; the trait is the seam tests substitute a fake at.

use crate::error::Result;
use crate::pipeline::LoadedImage;
use crate::types::OcrResponse;
use async_trait::async_trait;
use base64::Engine;

/// Base64-encoded image ready to send to a remote API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/webp")
    pub media_type: String,
}

impl ImageInput {
    /// Encode the original file bytes of a loaded image.
    pub fn from_image(image: &LoadedImage) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(&image.bytes),
            media_type: image.mime_type().to_string(),
        }
    }
}

/// Trait that all OCR backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the pipeline holds an `Arc<dyn OcrClient>`).
#[async_trait]
pub trait OcrClient: Send + Sync {
    /// Backend name for logging (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send the image and prompts, returning the validated raw response.
    ///
    /// The response text is not parsed here.
    async fn extract(
        &self,
        image: &LoadedImage,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<OcrResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};
    use std::path::PathBuf;

    fn loaded(bytes: Vec<u8>, format: ImageFormat) -> LoadedImage {
        LoadedImage {
            path: PathBuf::from("scan"),
            image: DynamicImage::new_rgb8(1, 1),
            bytes,
            format,
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn test_image_input_uses_detected_mime() {
        let input = ImageInput::from_image(&loaded(vec![0xFF, 0xD8, 0xFF], ImageFormat::Jpeg));
        assert_eq!(input.media_type, "image/jpeg");

        let input = ImageInput::from_image(&loaded(vec![1, 2, 3], ImageFormat::WebP));
        assert_eq!(input.media_type, "image/webp");
    }

    #[test]
    fn test_image_input_encodes_original_bytes() {
        let input = ImageInput::from_image(&loaded(vec![1, 2, 3], ImageFormat::Png));
        assert_eq!(input.data, "AQID");
    }
}
