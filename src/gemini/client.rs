// Gemini API client
// Author: kelexine (https://github.com/kelexine)

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error};

use super::GenerativeBackend;
use crate::config::GeminiConfig;
use crate::error::{InitError, ServiceError};
use crate::models::gemini::{
    ApiErrorResponse, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use crate::utils::logging::sanitize;
use crate::vision::models::{Credential, ValidatedImage};

/// Client for the Google Gemini `generateContent` API.
///
/// Holds the API key and model identity for the lifetime of one analyzer.
/// Construction is offline; the key is only checked by the first request.
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
    credential: Credential,
}

impl GeminiClient {
    /// Create a new Gemini client for the given API key.
    pub fn new(credential: &Credential, config: &GeminiConfig) -> Result<Self, InitError> {
        if credential.is_blank() {
            return Err(InitError("API key must not be empty".to_string()));
        }

        // The key travels in a header, so it must be a legal header value
        HeaderValue::from_str(credential.expose())
            .map_err(|_| InitError("API key contains invalid characters".to_string()))?;

        if config.model.trim().is_empty() {
            return Err(InitError("model name must not be empty".to_string()));
        }

        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .use_rustls_tls();
        // Only bound the call when asked to
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let http_client = builder
            .build()
            .map_err(|e| InitError(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Configured Gemini client for model {}", config.model);

        Ok(Self {
            http_client,
            config: config.clone(),
            credential: credential.clone(),
        })
    }

    /// Generation parameters from configuration, if any were set.
    fn generation_config(&self) -> Option<GenerationConfig> {
        if self.config.max_output_tokens.is_none() && self.config.temperature.is_none() {
            return None;
        }
        Some(GenerationConfig {
            max_output_tokens: self.config.max_output_tokens,
            temperature: self.config.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Call Gemini `generateContent` API (blocking, no retries).
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ServiceError> {
        let url = self.endpoint();
        let request_id = uuid::Uuid::new_v4().simple();
        debug!("[{}] Calling generateContent for model {}", request_id, self.config.model);

        let start = Instant::now();
        let result = self.send(&url, request).await;
        let status_code = match &result {
            Ok(_) => 200,
            Err(ServiceError::Api { status, .. }) => *status,
            Err(_) => 0,
        };
        crate::metrics::record_gemini_call(
            &self.config.model,
            status_code,
            start.elapsed().as_secs_f64(),
        );

        let response = result?;
        if let Some(usage) = &response.usage_metadata {
            crate::metrics::record_tokens(
                &self.config.model,
                usage.prompt_token_count.unwrap_or(0),
                usage.candidates_token_count.unwrap_or(0),
            );
        }

        debug!("[{}] Received Gemini response in {:?}", request_id, start.elapsed());
        Ok(response)
    }

    async fn send(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ServiceError> {
        let response = self
            .http_client
            .post(url)
            .header("x-goog-api-key", self.credential.expose())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = Self::extract_error_message(&response_text)
                .unwrap_or_else(|| response_text.clone());
            error!("Gemini API error: HTTP {} - {}", status, sanitize(&message));
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let gemini_response: GenerateContentResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                error!("Failed to parse Gemini response: {}", e);
                debug!(
                    "Response body (first 500 chars): {}",
                    response_text.chars().take(500).collect::<String>()
                );
                ServiceError::Parse(e)
            })?;

        if let Some(reason) = gemini_response.block_reason() {
            return Err(ServiceError::Blocked(reason.to_string()));
        }

        Ok(gemini_response)
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        let error_resp = serde_json::from_str::<ApiErrorResponse>(response_text).ok()?;
        let error = error_resp.error?;
        error.message.or(error.status)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    fn configure(credential: &Credential, config: &GeminiConfig) -> Result<Self, InitError> {
        Self::new(credential, config)
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str, image: &ValidatedImage) -> Result<String, ServiceError> {
        let inline = image.to_inline_data()?;
        let request = GenerateContentRequest::vision(prompt, inline, self.generation_config());
        let response = self.generate_content(&request).await?;
        Ok(response.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_rejected() {
        let result = GeminiClient::new(&Credential::new("   "), &GeminiConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_key_with_newline_rejected() {
        let result = GeminiClient::new(&Credential::new("AIza\nbad"), &GeminiConfig::default());
        let err = result.err().expect("newline must be rejected");
        assert!(err.0.contains("invalid characters"));
    }

    #[test]
    fn test_endpoint_format() {
        let config = GeminiConfig {
            api_base_url: "http://localhost:1234/v1beta/".to_string(),
            ..GeminiConfig::default()
        };
        let client = GeminiClient::new(&Credential::new("VALID_KEY"), &config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:1234/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_generation_config_only_when_configured() {
        let client = GeminiClient::new(&Credential::new("VALID_KEY"), &GeminiConfig::default()).unwrap();
        assert!(client.generation_config().is_none());

        let config = GeminiConfig {
            max_output_tokens: Some(256),
            ..GeminiConfig::default()
        };
        let client = GeminiClient::new(&Credential::new("VALID_KEY"), &config).unwrap();
        let generation = client.generation_config().unwrap();
        assert_eq!(generation.max_output_tokens, Some(256));
        assert_eq!(generation.temperature, None);
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(
            GeminiClient::extract_error_message(body).as_deref(),
            Some("API key not valid. Please pass a valid API key.")
        );
        assert_eq!(GeminiClient::extract_error_message("not json"), None);
    }
}
