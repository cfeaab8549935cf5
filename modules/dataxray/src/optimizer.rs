//! Rewrites a free-text query into one better suited to dataset search.

use ai_client::{AiError, GenerateRequest, GenerativeModel};
use tracing::{debug, warn};

fn rewrite_instruction(query: &str) -> String {
    format!(
        "You are a dataset research expert. Rewrite the following user query to be a highly \
effective search string for finding specific, downloadable datasets (CSV, JSON, SQL).

Rules:
1. Keep it concise but descriptive.
2. Add keywords like 'dataset', 'CSV', 'statistics', or 'database' where appropriate.
3. Do not add quotes unless necessary.
4. Output ONLY the optimized query string.

User Query: {query}"
    )
}

pub struct QueryOptimizer<M> {
    model: M,
}

impl<M: GenerativeModel> QueryOptimizer<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Never fails: any provider error, or an empty rewrite, yields the
    /// original query unchanged.
    pub async fn optimize(&self, original: &str) -> String {
        match self.try_optimize(original).await {
            Ok(Some(rewritten)) => {
                debug!(original, rewritten = %rewritten, "Query optimized");
                rewritten
            }
            Ok(None) => {
                debug!(original, "Optimizer returned no text, keeping original query");
                original.to_string()
            }
            Err(e) => {
                warn!(error = %e, original, "Query optimization failed, keeping original query");
                original.to_string()
            }
        }
    }

    async fn try_optimize(&self, original: &str) -> Result<Option<String>, AiError> {
        let request = GenerateRequest::new(rewrite_instruction(original));
        let response = self.model.generate(request).await?;

        Ok(response
            .text
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockModel;

    #[tokio::test]
    async fn returns_trimmed_rewrite() {
        let model = MockModel::new().with_text("  CO2 emissions dataset CSV global statistics\n");
        let optimizer = QueryOptimizer::new(model.clone());

        let optimized = optimizer.optimize("co2 data").await;

        assert_eq!(optimized, "CO2 emissions dataset CSV global statistics");
        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].prompt.ends_with("User Query: co2 data"));
        assert!(!requests[0].search_grounding);
        assert!(requests[0].system_instruction.is_none());
    }

    #[tokio::test]
    async fn whitespace_rewrite_falls_back() {
        let optimizer = QueryOptimizer::new(MockModel::new().with_text("   \n\t"));
        assert_eq!(optimizer.optimize("co2 data").await, "co2 data");
    }

    #[tokio::test]
    async fn missing_text_falls_back() {
        let optimizer = QueryOptimizer::new(MockModel::new().with_empty_response());
        assert_eq!(optimizer.optimize("co2 data").await, "co2 data");
    }

    #[tokio::test]
    async fn provider_error_falls_back() {
        let optimizer = QueryOptimizer::new(MockModel::new().with_network_error("connection reset"));
        assert_eq!(optimizer.optimize("co2 data").await, "co2 data");
    }

    #[tokio::test]
    async fn repeated_optimization_never_returns_empty() {
        let model = MockModel::new()
            .with_text("co2 emissions dataset")
            .with_api_error(503, "overloaded")
            .with_text("");
        let optimizer = QueryOptimizer::new(model);

        let first = optimizer.optimize("co2").await;
        let second = optimizer.optimize(&first).await;
        let third = optimizer.optimize(&second).await;

        assert_eq!(first, "co2 emissions dataset");
        assert_eq!(second, first);
        assert_eq!(third, first);
    }
}
