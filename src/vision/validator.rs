// Upload validation and color normalization
// Author: kelexine (https://github.com/kelexine)

use image::DynamicImage;
use tracing::{debug, warn};

use super::models::{ImageFormat, UploadedBlob, ValidatedImage, MAX_UPLOAD_BYTES};
use crate::error::ValidationError;

/// Turns raw uploads into RGB images.
///
/// Pure: no network access and no state beyond the configured size ceiling.
#[derive(Debug, Clone, Copy)]
pub struct ImageValidator {
    max_bytes: u64,
}

impl Default for ImageValidator {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl ImageValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator with a custom ceiling, e.g. from `UploadConfig`.
    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Validate an upload and normalize it to three-channel color.
    ///
    /// The size (declared or actual, whichever is larger) is checked before
    /// any decoding. Alpha is dropped, not composited, and palette images
    /// are expanded to RGB.
    pub fn validate(&self, blob: Option<&UploadedBlob>) -> Result<ValidatedImage, ValidationError> {
        let result = self.validate_inner(blob);
        crate::metrics::record_validation(match &result {
            Ok(_) => "ok",
            Err(ValidationError::NoFile) => "no_file",
            Err(ValidationError::SizeExceeded { .. }) => "size_exceeded",
            Err(ValidationError::DecodeFailure(_)) => "decode_failure",
        });
        result
    }

    fn validate_inner(&self, blob: Option<&UploadedBlob>) -> Result<ValidatedImage, ValidationError> {
        let blob = blob.ok_or(ValidationError::NoFile)?;

        let size = blob.effective_size();
        if size > self.max_bytes {
            warn!("Rejecting upload of {} bytes (limit {})", size, self.max_bytes);
            return Err(ValidationError::SizeExceeded {
                size,
                limit: self.max_bytes,
            });
        }

        let format = ImageFormat::detect(blob.data()).ok_or_else(|| {
            ValidationError::DecodeFailure(
                "unsupported or unrecognized image format (expected PNG, JPEG or WebP)".to_string(),
            )
        })?;

        let decoded = image::load_from_memory_with_format(blob.data(), format.codec())
            .map_err(|e| ValidationError::DecodeFailure(e.to_string()))?;

        let original_color = decoded.color();
        let pixels = match decoded {
            DynamicImage::ImageRgb8(pixels) => pixels,
            other => {
                debug!("Converting {:?} image to RGB8", original_color);
                other.to_rgb8()
            }
        };

        debug!(
            "Validated {:?} image {}x{}",
            format,
            pixels.width(),
            pixels.height()
        );

        Ok(ValidatedImage::new(pixels, format, original_color))
    }
}

/// Validate with the default 10 MiB ceiling.
pub fn validate_image(blob: Option<&UploadedBlob>) -> Result<ValidatedImage, ValidationError> {
    ImageValidator::default().validate(blob)
}
