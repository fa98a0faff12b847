//! Provider adapter.
//!
//! Turns a [`GenerationRequest`] into the provider-agnostic instruction + inline binary shape and
//! hands it to whichever [`ContentProvider`] was injected at construction time.

mod gemini;
mod instruction;

pub use gemini::{GeminiClient, GeminiConfig};
pub use instruction::compose_instruction;

use crate::error::{ProviderError, WorkflowError};
use crate::model::GenerationRequest;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::Arc;

/// Base64 payload paired with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineBinary {
    pub data: String,
    pub mime_type: String,
}

/// What a generative-content capability receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub instruction_text: String,
    pub inline_binary: Option<InlineBinary>,
}

/// Generative-content capability: given a structured request, return generated text.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn generate(&self, request: &ProviderRequest) -> Result<String, ProviderError>;
}

/// Adapter between the workflow and an optional provider.
#[derive(Clone)]
pub struct ProviderAdapter {
    provider: Option<Arc<dyn ContentProvider>>,
}

impl ProviderAdapter {
    pub fn new(provider: Option<Arc<dyn ContentProvider>>) -> Self {
        Self { provider }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Build the provider request for `request`.
    pub fn prepare(request: &GenerationRequest) -> ProviderRequest {
        let inline_binary = request
            .image
            .as_ref()
            .filter(|_| request.format.accepts_image())
            .map(|img| InlineBinary {
                data: BASE64.encode(&img.bytes),
                mime_type: img.mime_type.clone(),
            });
        ProviderRequest {
            instruction_text: compose_instruction(request),
            inline_binary,
        }
    }

    /// Single request/response call. Empty output is an error.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, WorkflowError> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            WorkflowError::ProviderUnavailable("no provider API key is configured".into())
        })?;

        let prepared = Self::prepare(request);
        tracing::debug!(
            format = %request.format,
            instruction_chars = prepared.instruction_text.chars().count(),
            has_image = prepared.inline_binary.is_some(),
            "sending generation request"
        );

        let text = provider
            .generate(&prepared)
            .await
            .map_err(|e| WorkflowError::ProviderRequest(e.to_string()))?;
        if text.trim().is_empty() {
            return Err(WorkflowError::ProviderRequest(
                ProviderError::EmptyOutput.to_string(),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Provider returning canned responses and recording every request it sees.
    pub(crate) struct FakeProvider {
        response: Mutex<Result<String, String>>,
        delay: Option<Duration>,
        pub(crate) seen: Mutex<Vec<ProviderRequest>>,
    }

    impl FakeProvider {
        pub(crate) fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(Ok(text.to_string())),
                delay: None,
                seen: Mutex::new(Vec::new()),
            })
        }

        /// Like [`FakeProvider::ok`], but each call sleeps for `delay` first.
        pub(crate) fn slow(text: &str, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(Ok(text.to_string())),
                delay: Some(delay),
                seen: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(Err(message.to_string())),
                delay: None,
                seen: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ContentProvider for FakeProvider {
        async fn generate(&self, request: &ProviderRequest) -> Result<String, ProviderError> {
            self.seen.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &*self.response.lock().unwrap() {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(ProviderError::Decode(message.clone())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeProvider;
    use super::*;
    use crate::model::{ImageAttachment, PlatformFormat};

    fn request(format: PlatformFormat, image: Option<ImageAttachment>) -> GenerationRequest {
        GenerationRequest {
            format,
            prompt: "sunset".into(),
            image,
        }
    }

    fn png() -> ImageAttachment {
        ImageAttachment {
            file_name: "a.png".into(),
            mime_type: "image/png".into(),
            bytes: b"hello".to_vec(),
        }
    }

    #[tokio::test]
    async fn missing_provider_is_unavailable() {
        let adapter = ProviderAdapter::new(None);
        let err = adapter
            .generate(&request(PlatformFormat::Thread, None))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn blank_output_is_a_request_error() {
        let adapter = ProviderAdapter::new(Some(FakeProvider::ok("  \n ")));
        let err = adapter
            .generate(&request(PlatformFormat::Thread, None))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ProviderRequest(_)));
    }

    #[tokio::test]
    async fn transport_failure_is_a_request_error() {
        let adapter = ProviderAdapter::new(Some(FakeProvider::failing("boom")));
        let err = adapter
            .generate(&request(PlatformFormat::ProfessionalPost, None))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ProviderRequest(m) if m.contains("boom")));
    }

    #[tokio::test]
    async fn photo_caption_sends_base64_image() {
        let provider = FakeProvider::ok("caption");
        let adapter = ProviderAdapter::new(Some(provider.clone()));
        adapter
            .generate(&request(PlatformFormat::PhotoCaption, Some(png())))
            .await
            .unwrap();

        let seen = provider.seen.lock().unwrap();
        let inline = seen[0].inline_binary.as_ref().unwrap();
        assert_eq!(inline.data, "aGVsbG8=");
        assert_eq!(inline.mime_type, "image/png");
        assert!(seen[0]
            .instruction_text
            .ends_with("Describe the image and incorporate it into the caption."));
    }

    #[test]
    fn image_is_not_sent_for_other_formats() {
        let prepared = ProviderAdapter::prepare(&request(PlatformFormat::Thread, Some(png())));
        assert!(prepared.inline_binary.is_none());
        assert!(!prepared.instruction_text.contains("Describe the image"));
    }
}
