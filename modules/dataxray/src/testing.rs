// Test mock for the generative model boundary.
//
// MockModel (GenerativeModel) replays a scripted queue of responses and
// records every request it receives. An exhausted queue is an error, so a
// test that makes an unexpected call fails loudly.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use ai_client::{AiError, GenerateRequest, GenerateResponse, GenerativeModel, GroundingChunk};
use async_trait::async_trait;

enum Scripted {
    Response(GenerateResponse),
    Network(String),
    Api(u16, String),
}

#[derive(Default)]
struct Inner {
    script: VecDeque<Scripted>,
    requests: Vec<GenerateRequest>,
}

/// Clones share the same script and request log.
#[derive(Clone, Default)]
pub struct MockModel {
    inner: Arc<Mutex<Inner>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, entry: Scripted) -> Self {
        self.inner.lock().unwrap().script.push_back(entry);
        self
    }

    pub fn with_response(self, response: GenerateResponse) -> Self {
        self.push(Scripted::Response(response))
    }

    /// Text only, no grounding metadata.
    pub fn with_text(self, text: &str) -> Self {
        self.with_response(GenerateResponse {
            text: Some(text.to_string()),
            grounding_sources: None,
        })
    }

    pub fn with_grounded(self, text: &str, sources: Vec<GroundingChunk>) -> Self {
        self.with_response(GenerateResponse {
            text: Some(text.to_string()),
            grounding_sources: Some(sources),
        })
    }

    /// `{ text: None, grounding_sources: None }`.
    pub fn with_empty_response(self) -> Self {
        self.with_response(GenerateResponse::default())
    }

    pub fn with_network_error(self, message: &str) -> Self {
        self.push(Scripted::Network(message.to_string()))
    }

    pub fn with_api_error(self, status: u16, message: &str) -> Self {
        self.push(Scripted::Api(status, message.to_string()))
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().requests.len()
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate(&self, request: GenerateRequest) -> ai_client::Result<GenerateResponse> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(request);
        match inner.script.pop_front() {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Network(message)) => Err(AiError::Network(message)),
            Some(Scripted::Api(status, message)) => Err(AiError::Api { status, message }),
            None => Err(AiError::Config(
                "MockModel: no scripted response left".to_string(),
            )),
        }
    }
}
