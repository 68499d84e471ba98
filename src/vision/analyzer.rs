// Single-shot vision question answering
// Author: kelexine (https://github.com/kelexine)

use std::time::Instant;
use tracing::{error, info, warn};

use super::models::{AnalysisResult, Credential, ValidatedImage};
use crate::config::GeminiConfig;
use crate::error::InitError;
use crate::gemini::{GeminiClient, GenerativeBackend};

const PROMPT_PREFIX: &str = "Please analyze this image and answer the following question: ";
const EMPTY_RESPONSE: &str = "No response generated from the model.";
const EMPTY_QUESTION: &str = "Please enter a question.";

/// Build the combined prompt sent with the image.
pub fn build_prompt(question: &str) -> String {
    format!("{}{}", PROMPT_PREFIX, question)
}

/// Answers one question about one image per call.
///
/// Holds a configured backend handle. One instance per session; it is not
/// meant to be shared across concurrent calls.
pub struct VisionAnalyzer<B: GenerativeBackend = GeminiClient> {
    backend: B,
}

impl<B: GenerativeBackend> VisionAnalyzer<B> {
    /// Configure the backend with default settings.
    pub fn create(credential: &Credential) -> Result<Self, InitError> {
        Self::create_with_config(credential, &GeminiConfig::default())
    }

    pub fn create_with_config(credential: &Credential, config: &GeminiConfig) -> Result<Self, InitError> {
        if credential.is_blank() {
            error!("Failed to initialize Gemini model: empty API key");
            return Err(InitError("API key must not be empty".to_string()));
        }

        let backend = B::configure(credential, config).map_err(|e| {
            error!("{}", e);
            e
        })?;

        info!("Gemini model {} initialized successfully.", backend.model());
        Ok(Self { backend })
    }

    /// Wrap an already configured backend.
    pub fn from_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Ask `question` about `image`. Never fails: every fault becomes `Failure`.
    pub async fn analyze(&self, image: ValidatedImage, question: &str) -> AnalysisResult {
        let model = self.backend.model().to_string();

        if question.trim().is_empty() {
            warn!("Refusing to analyze with an empty question");
            crate::metrics::record_analysis(&model, "empty_question");
            return AnalysisResult::Failure(EMPTY_QUESTION.to_string());
        }

        let prompt = build_prompt(question);
        let start = Instant::now();

        let (result, outcome) = match self.backend.generate(&prompt, &image).await {
            Ok(text) if text.trim().is_empty() => {
                warn!("Model {} returned an empty response", model);
                (AnalysisResult::Failure(EMPTY_RESPONSE.to_string()), "empty_response")
            }
            Ok(text) => (AnalysisResult::Success(text), "success"),
            Err(e) => {
                let error_msg = format!("Error during image analysis: {}", e);
                error!("{}", crate::utils::logging::sanitize(&error_msg));
                (AnalysisResult::Failure(error_msg), "service_error")
            }
        };

        info!(
            "Analysis with {} finished as {} in {:?}",
            model,
            outcome,
            start.elapsed()
        );
        crate::metrics::record_analysis(&model, outcome);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::vision::models::UploadedBlob;
    use crate::vision::validator::validate_image;
    use async_trait::async_trait;
    use image::{DynamicImage, ImageBuffer, Rgb};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted backend recording every prompt it sees.
    struct ScriptedBackend {
        reply: fn() -> Result<String, ServiceError>,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(reply: fn() -> Result<String, ServiceError>) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerativeBackend for ScriptedBackend {
        fn configure(credential: &Credential, _config: &GeminiConfig) -> Result<Self, InitError> {
            if credential.expose() == "MALFORMED" {
                return Err(InitError("credential rejected".to_string()));
            }
            Ok(Self::new(|| Ok("configured".to_string())))
        }

        fn model(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, prompt: &str, _image: &ValidatedImage) -> Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            (self.reply)()
        }
    }

    fn sample_image() -> ValidatedImage {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(2, 2, Rgb([255, 0, 0])))
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        validate_image(Some(&UploadedBlob::new(buf))).unwrap()
    }

    #[test]
    fn test_prompt_template() {
        assert_eq!(
            build_prompt("What color is the object?"),
            "Please analyze this image and answer the following question: What color is the object?"
        );
    }

    #[test]
    fn test_create_rejects_empty_credential() {
        let result = VisionAnalyzer::<ScriptedBackend>::create(&Credential::new(""));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_surfaces_backend_rejection() {
        let result = VisionAnalyzer::<ScriptedBackend>::create(&Credential::new("MALFORMED"));
        assert_eq!(result.err(), Some(InitError("credential rejected".to_string())));
    }

    #[tokio::test]
    async fn test_success_passes_text_through_unmodified() {
        let analyzer = VisionAnalyzer::from_backend(ScriptedBackend::new(|| {
            Ok("  The object is red.\n".to_string())
        }));

        let result = analyzer.analyze(sample_image(), "What color?").await;
        assert_eq!(result, AnalysisResult::Success("  The object is red.\n".to_string()));

        let prompts = analyzer.backend().prompts.lock().unwrap();
        assert_eq!(
            prompts.as_slice(),
            ["Please analyze this image and answer the following question: What color?"]
        );
    }

    #[tokio::test]
    async fn test_blank_response_is_failure() {
        let analyzer = VisionAnalyzer::from_backend(ScriptedBackend::new(|| Ok(" \n\t".to_string())));
        let result = analyzer.analyze(sample_image(), "Anything?").await;
        assert_eq!(
            result,
            AnalysisResult::Failure("No response generated from the model.".to_string())
        );
    }

    #[tokio::test]
    async fn test_service_fault_is_caught() {
        let analyzer = VisionAnalyzer::from_backend(ScriptedBackend::new(|| {
            Err(ServiceError::Api {
                status: 503,
                message: "The model is overloaded.".to_string(),
            })
        }));

        let result = analyzer.analyze(sample_image(), "Anything?").await;
        match result {
            AnalysisResult::Failure(reason) => {
                assert!(reason.starts_with("Error during image analysis: "));
                assert!(reason.contains("The model is overloaded."));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_question_skips_remote_call() {
        let analyzer = VisionAnalyzer::from_backend(ScriptedBackend::new(|| Ok("unused".to_string())));
        let result = analyzer.analyze(sample_image(), "   ").await;

        assert!(!result.is_success());
        assert!(!result.message().is_empty());
        assert_eq!(analyzer.backend().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analyzer_is_reusable() {
        let analyzer =
            VisionAnalyzer::<ScriptedBackend>::create(&Credential::new("VALID_KEY")).unwrap();

        for _ in 0..3 {
            let result = analyzer.analyze(sample_image(), "Again?").await;
            assert_eq!(result, AnalysisResult::Success("configured".to_string()));
        }
        assert_eq!(analyzer.backend().calls.load(Ordering::SeqCst), 3);
    }
}
