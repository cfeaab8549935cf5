pub mod error;
pub mod gemini;
pub mod traits;
pub mod util;

pub use error::{AiError, Result};
pub use gemini::Gemini;
pub use traits::{GenerateRequest, GenerateResponse, GenerativeModel, GroundingChunk, WebSource};
pub use util::truncate_to_char_boundary;
