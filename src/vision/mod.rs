//! Image question answering pipeline.
//!
//! Raw uploads pass through `ImageValidator`, which enforces the size ceiling
//! and normalizes every image to three-channel RGB. `VisionAnalyzer` then
//! asks the remote model one question per call and folds every outcome into
//! an `AnalysisResult`.
//!
//! # Submodules
//!
//! - `models`: Uploads, validated images, credentials and results.
//! - `validator`: Size checks, decoding and color normalization.
//! - `analyzer`: Prompt construction and response interpretation.
//! - `pipeline`: The validate-then-analyze flow front ends call.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod analyzer;
pub mod models;
pub mod pipeline;
pub mod validator;

pub use analyzer::{build_prompt, VisionAnalyzer};
pub use models::{
    AnalysisResult, Credential, ImageFormat, UploadedBlob, ValidatedImage, MAX_UPLOAD_BYTES,
};
pub use pipeline::ask_about_image;
pub use validator::{validate_image, ImageValidator};
