mod client;
pub(crate) mod types;

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::error::{AiError, Result};
use crate::traits::{GenerateRequest, GenerateResponse, GenerativeModel};

use client::GeminiClient;
use types::GenerateContentRequest;

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// =============================================================================
// Gemini Model
// =============================================================================

#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            timeout: None,
        }
    }

    /// Reads `GEMINI_API_KEY`, falling back to `API_KEY`.
    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| AiError::Config("GEMINI_API_KEY environment variable not set".into()))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Per-request timeout. Without one a stalled provider stalls the caller.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn client(&self) -> Result<GeminiClient> {
        if self.api_key.trim().is_empty() {
            return Err(AiError::Config("Gemini API key is empty".into()));
        }
        let base_url = self.base_url.as_deref().unwrap_or(GEMINI_API_URL);
        GeminiClient::new(&self.api_key, base_url, self.timeout)
    }
}

impl std::fmt::Debug for Gemini {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gemini")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// GenerativeModel Implementation
// =============================================================================

#[async_trait]
impl GenerativeModel for Gemini {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let client = self.client()?;
        let wire = GenerateContentRequest::from(&request);
        let response = client.generate_content(&self.model, &wire).await?.into_response();

        debug!(
            model = %self.model,
            has_text = response.text.is_some(),
            sources = response.grounding_sources.as_ref().map_or(0, Vec::len),
            "Gemini response mapped"
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_new() {
        let ai = Gemini::new("test-key", "gemini-2.5-flash");
        assert_eq!(ai.model, "gemini-2.5-flash");
        assert_eq!(ai.api_key, "test-key");
        assert!(ai.timeout.is_none());
    }

    #[test]
    fn test_gemini_with_base_url_and_timeout() {
        let ai = Gemini::new("test-key", "gemini-2.5-flash")
            .with_base_url("http://127.0.0.1:8089/v1beta")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(ai.base_url.as_deref(), Some("http://127.0.0.1:8089/v1beta"));
        assert_eq!(ai.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let ai = Gemini::new("super-secret", "gemini-2.5-flash");
        assert!(!format!("{ai:?}").contains("super-secret"));
    }

    #[test]
    fn test_empty_key_fails_before_network() {
        let ai = Gemini::new("  ", "gemini-2.5-flash");
        let result = tokio_test::block_on(ai.generate(GenerateRequest::new("co2 data")));
        assert!(matches!(result, Err(AiError::Config(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let ai = Gemini::new("test-key", "gemini-2.5-flash")
            .with_base_url("http://127.0.0.1:1")
            .with_timeout(Duration::from_secs(2));
        let result = ai.generate(GenerateRequest::new("co2 data")).await;
        assert!(matches!(result, Err(AiError::Network(_))));
    }
}
