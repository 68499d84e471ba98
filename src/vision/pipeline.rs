// Validate-then-analyze flow used by front ends
// Author: kelexine (https://github.com/kelexine)

use tracing::info;

use super::analyzer::VisionAnalyzer;
use super::models::{Credential, UploadedBlob};
use super::validator::ImageValidator;
use crate::config::AppConfig;
use crate::error::{AppError, Result};

/// Answer `question` about `blob` with the configured Gemini model.
///
/// The question is checked first and the upload is validated before the
/// analyzer is created, so bad input never costs a remote call.
pub async fn ask_about_image(
    blob: &UploadedBlob,
    question: &str,
    credential: &Credential,
    config: &AppConfig,
) -> Result<String> {
    if question.trim().is_empty() {
        return Err(AppError::EmptyQuestion);
    }

    let validator = ImageValidator::with_max_bytes(config.upload.max_size_bytes);
    let image = validator.validate(Some(blob))?;
    info!(
        "Image validated successfully ({}x{}, {:?})",
        image.width(),
        image.height(),
        image.source_format()
    );

    let analyzer: VisionAnalyzer = VisionAnalyzer::create_with_config(credential, &config.gemini)?;

    match analyzer.analyze(image, question).await.into_parts() {
        (true, answer) => Ok(answer),
        (false, reason) => Err(AppError::Analysis(reason)),
    }
}
