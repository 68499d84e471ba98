// Error types for gemini-vision
// Author: kelexine (https://github.com/kelexine)

use thiserror::Error;

/// Why an uploaded blob could not become a `ValidatedImage`.
///
/// All variants are detected before any remote call is made and are
/// recoverable by supplying different input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No file uploaded.")]
    NoFile,

    #[error("File size exceeds 10MB limit ({size} bytes > {limit} bytes).")]
    SizeExceeded { size: u64, limit: u64 },

    #[error("Invalid image file: {0}")]
    DecodeFailure(String),
}

/// The remote client could not be configured with the given credential.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to initialize Gemini model: {0}")]
pub struct InitError(pub String);

/// A fault raised by the remote inference service during one call.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response blocked: {0}")]
    Blocked(String),

    #[error("Response parsing error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Image encoding error: {0}")]
    Encode(String),
}

/// Application-level errors surfaced by configuration loading and the
/// validate-then-analyze flow the binary drives.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Init(#[from] InitError),

    #[error("Please enter a question.")]
    EmptyQuestion,

    #[error("Analysis failed: {0}")]
    Analysis(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
