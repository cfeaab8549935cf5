pub mod config;
pub mod controller;
pub mod error;
pub mod optimizer;
pub mod platform;
pub mod render;
pub mod search;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::Config;
pub use controller::{Controller, Phase, UiState, SEARCH_FAILED_MESSAGE};
pub use error::SearchError;
pub use optimizer::QueryOptimizer;
pub use platform::Platform;
pub use search::{build_search_prompt, DatasetSearch, SearchOutcome, NO_SUMMARY};
