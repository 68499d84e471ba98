// Vision models and types
// Author: kelexine (https://github.com/kelexine)

use base64::Engine;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, ImageFormat as CodecFormat, RgbImage};
use std::io::Cursor;
use std::path::Path;
use zeroize::Zeroize;

use crate::error::ServiceError;
use crate::models::gemini::InlineData;

/// Validation limits
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024; // 10MB

/// Quality used when re-encoding JPEG sources for upload.
const JPEG_QUALITY: u8 = 90;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from magic bytes at start of image data
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"\xFF\xD8\xFF") {
            Some(ImageFormat::Jpeg)
        } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageFormat::Png)
        } else if data.len() >= 12 && data.starts_with(b"RIFF") && data[8..12] == *b"WEBP" {
            Some(ImageFormat::WebP)
        } else {
            None
        }
    }

    pub(crate) fn codec(&self) -> CodecFormat {
        match self {
            ImageFormat::Jpeg => CodecFormat::Jpeg,
            ImageFormat::Png => CodecFormat::Png,
            ImageFormat::WebP => CodecFormat::WebP,
        }
    }
}

/// Raw upload handed over by the caller.
///
/// `declared_size` is what the upload layer reported. The size ceiling is
/// enforced against the larger of it and the actual byte count.
#[derive(Debug, Clone)]
pub struct UploadedBlob {
    data: Bytes,
    declared_size: u64,
}

impl UploadedBlob {
    pub fn new(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let declared_size = data.len() as u64;
        Self { data, declared_size }
    }

    pub fn with_declared_size(data: impl Into<Bytes>, declared_size: u64) -> Self {
        Self {
            data: data.into(),
            declared_size,
        }
    }

    /// Read an upload from disk.
    pub async fn from_path(path: &Path) -> crate::error::Result<Self> {
        let data = tokio::fs::read(path).await?;
        Ok(Self::new(data))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn declared_size(&self) -> u64 {
        self.declared_size
    }

    /// Size checked against the ceiling: never less than the real length.
    pub fn effective_size(&self) -> u64 {
        self.declared_size.max(self.data.len() as u64)
    }
}

/// A decoded image normalized to three-channel RGB.
///
/// Only `ImageValidator` constructs these, and `VisionAnalyzer::analyze`
/// consumes them.
#[derive(Debug)]
pub struct ValidatedImage {
    pixels: RgbImage,
    source_format: ImageFormat,
    original_color: ColorType,
}

impl ValidatedImage {
    pub(crate) fn new(pixels: RgbImage, source_format: ImageFormat, original_color: ColorType) -> Self {
        Self {
            pixels,
            source_format,
            original_color,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Always `ColorType::Rgb8`.
    pub fn color_type(&self) -> ColorType {
        ColorType::Rgb8
    }

    pub fn source_format(&self) -> ImageFormat {
        self.source_format
    }

    /// Color layout of the upload before normalization.
    pub fn original_color(&self) -> ColorType {
        self.original_color
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Encode the pixels into an inline payload for `generateContent`.
    ///
    /// JPEG uploads go back out as JPEG; PNG and WebP uploads are sent as PNG.
    pub fn to_inline_data(&self) -> Result<InlineData, ServiceError> {
        let mut buf = Vec::new();
        let format = match self.source_format {
            ImageFormat::Jpeg => {
                JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
                    .encode_image(&self.pixels)
                    .map_err(|e| ServiceError::Encode(e.to_string()))?;
                ImageFormat::Jpeg
            }
            ImageFormat::Png | ImageFormat::WebP => {
                self.pixels
                    .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png.codec())
                    .map_err(|e| ServiceError::Encode(e.to_string()))?;
                ImageFormat::Png
            }
        };

        Ok(InlineData {
            mime_type: format.mime_type().to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(&buf),
        })
    }
}

/// Secret string authorizing calls to the remote inference service.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

// Custom Debug impl that never logs the key
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Credential").field(&"[REDACTED]").finish()
    }
}

/// Outcome of one analyze call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResult {
    Success(String),
    Failure(String),
}

impl AnalysisResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResult::Success(_))
    }

    /// Answer text on success, diagnostic on failure.
    pub fn message(&self) -> &str {
        match self {
            AnalysisResult::Success(text) | AnalysisResult::Failure(text) => text,
        }
    }

    /// The `(ok, message)` pair rendered by the presentation layer.
    pub fn into_parts(self) -> (bool, String) {
        match self {
            AnalysisResult::Success(text) => (true, text),
            AnalysisResult::Failure(reason) => (false, reason),
        }
    }
}
