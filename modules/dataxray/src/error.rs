use ai_client::AiError;
use thiserror::Error;

/// The one failure that crosses a component boundary. Callers use it to tell
/// "the request failed" apart from "the request found nothing".
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Dataset search failed: {0}")]
    Provider(#[from] AiError),
}

pub type Result<T> = std::result::Result<T, SearchError>;
