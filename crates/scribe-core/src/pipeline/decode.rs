//! Image loading with format detection and property checks.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::PathBuf;

use super::validate::validate_path;
use crate::config::LimitsConfig;
use crate::error::{OcrError, Result};

/// A fully decoded image held in memory.
///
/// The encoded bytes are kept alongside the bitmap so the remote call can
/// send the original file instead of a re-encoded copy.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Normalized source path
    pub path: PathBuf,
    /// The decoded bitmap
    pub image: DynamicImage,
    /// Original file bytes
    pub bytes: Vec<u8>,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl LoadedImage {
    /// Short format tag ("jpeg", "png", "webp", ...).
    pub fn format_name(&self) -> &'static str {
        format_to_str(self.format)
    }

    /// MIME type of the encoded bytes.
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Validate `path`, then read and decode the whole file.
///
/// Path problems surface as [`OcrError::Validation`]. I/O failures, unknown
/// formats, decode failures and bad dimensions surface as
/// [`OcrError::ImageLoad`]. The file is read into memory in one call, so no
/// handle outlives this function.
pub fn load_image(path: &str, limits: &LimitsConfig) -> Result<LoadedImage> {
    let validated = validate_path(path, limits)?;

    let bytes = std::fs::read(&validated).map_err(|e| load_error(path, e))?;
    let (image, format) = decode_bytes(&bytes, path)?;

    let (width, height) = image.dimensions();
    let format = check_properties(format, width, height)?;

    tracing::debug!(
        "Loaded {} ({}x{}, {})",
        validated.display(),
        width,
        height,
        format_to_str(format)
    );

    Ok(LoadedImage {
        path: validated,
        image,
        bytes,
        format,
        width,
        height,
    })
}

/// Reject decoded images with an unknown format or an empty dimension.
pub fn check_properties(
    format: Option<ImageFormat>,
    width: u32,
    height: u32,
) -> Result<ImageFormat> {
    let format = format.ok_or_else(|| {
        OcrError::ImageLoad("Image format could not be determined".into())
    })?;
    if width == 0 || height == 0 {
        return Err(OcrError::ImageLoad(format!(
            "Image has invalid dimensions: {width}x{height}"
        )));
    }
    Ok(format)
}

fn decode_bytes(bytes: &[u8], path: &str) -> Result<(DynamicImage, Option<ImageFormat>)> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| load_error(path, e))?;
    let format = reader.format();
    let image = reader.decode().map_err(|e| load_error(path, e))?;
    Ok((image, format))
}

fn load_error(path: &str, err: impl std::fmt::Display) -> OcrError {
    OcrError::ImageLoad(format!("Failed to load image from {path}: {err}"))
}

/// Convert an ImageFormat to its short tag.
pub fn format_to_str(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::WebP => "webp",
        ImageFormat::Gif => "gif",
        ImageFormat::Tiff => "tiff",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Ico => "ico",
        ImageFormat::Pnm => "pnm",
        ImageFormat::Avif => "avif",
        _ => "unknown",
    }
}
