use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;

// =============================================================================
// Request
// =============================================================================

/// A single-turn generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub search_grounding: bool,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
            search_grounding: false,
        }
    }

    pub fn system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Back the answer with live web search results.
    pub fn with_search_grounding(mut self) -> Self {
        self.search_grounding = true;
        self
    }
}

// =============================================================================
// Response
// =============================================================================

/// A discovered web link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    pub uri: String,
    pub title: String,
}

/// One grounding entry. `web` is `None` when the provider returned an entry
/// without usable link data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebSource>,
}

impl GroundingChunk {
    pub fn web(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            web: Some(WebSource {
                uri: uri.into(),
                title: title.into(),
            }),
        }
    }

    pub fn empty() -> Self {
        Self { web: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    pub text: Option<String>,
    /// Provider order is preserved. `None` when the response carried no
    /// grounding metadata at all.
    pub grounding_sources: Option<Vec<GroundingChunk>>,
}

// =============================================================================
// GenerativeModel Trait
// =============================================================================

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;
}

#[async_trait]
impl<M: GenerativeModel + ?Sized> GenerativeModel for Arc<M> {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        (**self).generate(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = GenerateRequest::new("find data")
            .system("be brief")
            .with_search_grounding();
        assert_eq!(request.prompt, "find data");
        assert_eq!(request.system_instruction.as_deref(), Some("be brief"));
        assert!(request.search_grounding);
    }

    #[test]
    fn test_request_defaults_to_ungrounded() {
        let request = GenerateRequest::new("rewrite this");
        assert!(request.system_instruction.is_none());
        assert!(!request.search_grounding);
    }
}
