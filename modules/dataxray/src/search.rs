//! Dataset search: one grounded generation call per query, shaped into a
//! summary plus the provider's source list.

use ai_client::{GenerateRequest, GenerativeModel, GroundingChunk, WebSource};
use serde::Serialize;
use tracing::{error, info};

use crate::error::Result;

pub const NO_SUMMARY: &str = "No summary generated.";

pub const SEARCH_SYSTEM_INSTRUCTION: &str = "You are DataXray, a specialized engine for finding \
data sets. Your goal is to find downloadable datasets (CSV, JSON, Images, Parquet) for the user. \
Summarize the findings briefly using Markdown formatting (bolding key terms). The search tool will \
provide the actual links.";

/// Summary text plus sources in provider (relevance) order. Sources are
/// passed through untouched: duplicates and entries without link data stay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub summary: String,
    pub sources: Vec<GroundingChunk>,
}

impl SearchOutcome {
    /// Sources that carry link data, in order.
    pub fn records(&self) -> impl Iterator<Item = &WebSource> {
        self.sources.iter().filter_map(|chunk| chunk.web.as_ref())
    }
}

/// The focus clause is omitted entirely when `platform_suffix` is empty.
pub fn build_search_prompt(query: &str, platform_suffix: &str) -> String {
    let mut prompt = format!("Find datasets related to: {query}.");
    if !platform_suffix.is_empty() {
        prompt.push_str(&format!(" Focus search on: {platform_suffix}."));
    }
    prompt.push_str(" Return a summary of what these datasets contain.");
    prompt
}

pub struct DatasetSearch<M> {
    model: M,
}

impl<M: GenerativeModel> DatasetSearch<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub async fn search(&self, query: &str, platform_suffix: &str) -> Result<SearchOutcome> {
        let request = GenerateRequest::new(build_search_prompt(query, platform_suffix))
            .system(SEARCH_SYSTEM_INSTRUCTION)
            .with_search_grounding();

        let response = match self.model.generate(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, query, "Dataset search failed");
                return Err(e.into());
            }
        };

        let outcome = SearchOutcome {
            summary: response
                .text
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| NO_SUMMARY.to_string()),
            sources: response.grounding_sources.unwrap_or_default(),
        };

        info!(
            query,
            sources = outcome.sources.len(),
            linked = outcome.records().count(),
            "Dataset search completed"
        );

        Ok(outcome)
    }
}
