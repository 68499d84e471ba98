// Gemini API client module
// Author: kelexine (https://github.com/kelexine)

mod client;

pub use client::GeminiClient;

use async_trait::async_trait;

use crate::config::GeminiConfig;
use crate::error::{InitError, ServiceError};
use crate::vision::models::{Credential, ValidatedImage};

/// A remote model that can answer a prompt about an image.
///
/// `GeminiClient` is the production implementation; tests plug in their own.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Build a configured handle. Must not perform network I/O.
    fn configure(credential: &Credential, config: &GeminiConfig) -> Result<Self, InitError>
    where
        Self: Sized;

    /// Model identity, used for logs and metrics.
    fn model(&self) -> &str;

    /// Issue exactly one generation request and return the raw text.
    ///
    /// An empty string is a valid success; interpreting it is the caller's job.
    async fn generate(&self, prompt: &str, image: &ValidatedImage) -> Result<String, ServiceError>;
}
