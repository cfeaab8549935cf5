//! Result presentation controller.
//!
//! Owns [`UiState`] and sequences calls into [`DatasetSearch`] and
//! [`QueryOptimizer`]. Each user action is split into a synchronous `begin_*`
//! step that applies the immediate state change, the awaited provider call,
//! and a `complete_*` step that applies the result. Search tickets are stamped
//! with a generation; completions for superseded searches are dropped. Only
//! one optimize ticket can be outstanding at a time.

use ai_client::{GenerativeModel, GroundingChunk, WebSource};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::optimizer::QueryOptimizer;
use crate::platform::Platform;
use crate::search::{DatasetSearch, SearchOutcome};

pub const SEARCH_FAILED_MESSAGE: &str = "Failed to fetch datasets. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Searching,
    Displaying,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// Current input text. Set by submit and by a completed optimize.
    pub query: String,
    pub selected_platform: Platform,
    pub results: Vec<GroundingChunk>,
    pub summary: String,
    pub loading: bool,
    pub error: Option<String>,
    pub has_searched: bool,
    pub is_optimizing: bool,
}

impl UiState {
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Searching
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.has_searched {
            Phase::Displaying
        } else {
            Phase::Idle
        }
    }

    /// Results that carry link data, in relevance order.
    pub fn visible_results(&self) -> impl Iterator<Item = &WebSource> {
        self.results.iter().filter_map(|chunk| chunk.web.as_ref())
    }

    /// Counted after malformed records are skipped, so it always agrees with
    /// what is displayed.
    pub fn result_count(&self) -> usize {
        self.visible_results().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
    platform: Platform,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeTicket {
    query: String,
}

impl OptimizeTicket {
    pub fn query(&self) -> &str {
        &self.query
    }
}

pub struct Controller<M> {
    state: UiState,
    search: DatasetSearch<M>,
    optimizer: QueryOptimizer<M>,
    search_generation: u64,
}

impl<M: GenerativeModel + Clone> Controller<M> {
    pub fn new(model: M) -> Self {
        Self {
            state: UiState::default(),
            search: DatasetSearch::new(model.clone()),
            optimizer: QueryOptimizer::new(model),
            search_generation: 0,
        }
    }
}

impl<M: GenerativeModel> Controller<M> {
    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Only affects the next submitted search.
    pub fn select_platform(&mut self, platform: Platform) {
        debug!(platform = platform.id(), "Platform selected");
        self.state.selected_platform = platform;
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Enter `Searching`. Returns `None`, leaving state untouched, for a blank
    /// query. A search started while another is in flight supersedes it.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchTicket> {
        if query.trim().is_empty() {
            return None;
        }
        if self.state.loading {
            warn!(query, "Search submitted while another is in flight, superseding it");
        }

        self.search_generation += 1;
        self.state.loading = true;
        self.state.error = None;
        self.state.query = query.to_string();
        self.state.has_searched = true;
        self.state.results.clear();
        self.state.summary.clear();

        Some(SearchTicket {
            generation: self.search_generation,
            query: query.to_string(),
            platform: self.state.selected_platform,
        })
    }

    pub async fn run_search(&self, ticket: &SearchTicket) -> Result<SearchOutcome> {
        self.search
            .search(&ticket.query, ticket.platform.query_suffix())
            .await
    }

    /// Apply a finished search. Returns `false` if the ticket was superseded
    /// and the result discarded.
    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        result: Result<SearchOutcome>,
    ) -> bool {
        if ticket.generation != self.search_generation {
            warn!(
                query = ticket.query.as_str(),
                stale = ticket.generation,
                current = self.search_generation,
                "Discarding stale search result"
            );
            return false;
        }

        self.state.loading = false;
        match result {
            Ok(outcome) => {
                info!(
                    query = ticket.query.as_str(),
                    platform = ticket.platform.id(),
                    sources = outcome.sources.len(),
                    "Displaying search results"
                );
                self.state.results = outcome.sources;
                self.state.summary = outcome.summary;
            }
            Err(e) => {
                warn!(error = %e, query = ticket.query.as_str(), "Search failed");
                self.state.results.clear();
                self.state.summary.clear();
                self.state.error = Some(SEARCH_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// Begin, run and complete a search in one step.
    pub async fn submit(&mut self, query: &str) -> Phase {
        if let Some(ticket) = self.begin_search(query) {
            let result = self.run_search(&ticket).await;
            self.complete_search(ticket, result);
        }
        self.state.phase()
    }

    // =========================================================================
    // Optimize
    // =========================================================================

    /// Refused for blank input, while optimizing, or while a search is loading.
    pub fn begin_optimize(&mut self, query: &str) -> Option<OptimizeTicket> {
        if query.trim().is_empty() || self.state.is_optimizing || self.state.loading {
            return None;
        }

        self.state.is_optimizing = true;

        Some(OptimizeTicket {
            query: query.to_string(),
        })
    }

    pub async fn run_optimize(&self, ticket: &OptimizeTicket) -> String {
        self.optimizer.optimize(&ticket.query).await
    }

    /// Overwrites the input text only; results, summary and error are kept.
    /// At most one ticket is outstanding, so it is always current.
    pub fn complete_optimize(&mut self, ticket: OptimizeTicket, optimized: String) {
        debug!(
            original = ticket.query.as_str(),
            optimized = optimized.as_str(),
            "Optimization applied"
        );
        self.state.is_optimizing = false;
        self.state.query = optimized;
    }

    /// Begin, run and complete an optimization. Returns the new input text.
    pub async fn optimize(&mut self, query: &str) -> Option<String> {
        let ticket = self.begin_optimize(query)?;
        let optimized = self.run_optimize(&ticket).await;
        self.complete_optimize(ticket, optimized);
        Some(self.state.query.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockModel;

    #[test]
    fn starts_idle() {
        let controller = Controller::new(MockModel::new());
        assert_eq!(controller.state().phase(), Phase::Idle);
        assert_eq!(controller.state(), &UiState::default());
    }

    #[test]
    fn blank_query_is_refused() {
        let mut controller = Controller::new(MockModel::new());
        assert!(controller.begin_search("   \t").is_none());
        assert!(controller.begin_optimize("").is_none());
        assert_eq!(controller.state(), &UiState::default());
    }

    #[test]
    fn select_platform_touches_nothing_else() {
        let mut controller = Controller::new(MockModel::new());
        controller.select_platform(Platform::Gov);

        let expected = UiState {
            selected_platform: Platform::Gov,
            ..UiState::default()
        };
        assert_eq!(controller.state(), &expected);
    }

    #[test]
    fn ticket_captures_platform_at_submit() {
        let mut controller = Controller::new(MockModel::new());
        controller.select_platform(Platform::Kaggle);
        let ticket = controller.begin_search("wildlife").unwrap();
        controller.select_platform(Platform::Papers);

        assert_eq!(ticket.platform(), Platform::Kaggle);
        assert_eq!(ticket.query(), "wildlife");
    }

    #[test]
    fn stale_search_completion_is_discarded() {
        let mut controller = Controller::new(MockModel::new());
        let first = controller.begin_search("first").unwrap();
        let second = controller.begin_search("second").unwrap();

        let applied = controller.complete_search(
            first,
            Ok(SearchOutcome {
                summary: "stale".into(),
                sources: vec![GroundingChunk::web("https://stale.example", "Stale")],
            }),
        );
        assert!(!applied);
        assert!(controller.state().loading);
        assert!(controller.state().summary.is_empty());

        assert!(controller.complete_search(
            second,
            Ok(SearchOutcome {
                summary: "fresh".into(),
                sources: vec![],
            }),
        ));
        assert_eq!(controller.state().summary, "fresh");
        assert_eq!(controller.state().query, "second");
        assert_eq!(controller.state().phase(), Phase::Displaying);
    }

    #[test]
    fn optimize_refused_while_loading_or_optimizing() {
        let mut controller = Controller::new(MockModel::new());
        let ticket = controller.begin_optimize("co2").unwrap();
        assert!(controller.state().is_optimizing);
        assert!(controller.begin_optimize("co2").is_none());
        controller.complete_optimize(ticket, "co2 dataset".into());

        controller.begin_search("co2").unwrap();
        assert!(controller.begin_optimize("co2").is_none());
    }

    #[test]
    fn completed_optimize_releases_the_guard() {
        let mut controller = Controller::new(MockModel::new());
        let first = controller.begin_optimize("co2").unwrap();
        controller.complete_optimize(first, "co2 dataset".into());

        assert!(!controller.state().is_optimizing);
        assert_eq!(controller.state().query, "co2 dataset");

        let second = controller.begin_optimize("co2 dataset").unwrap();
        assert_eq!(second.query(), "co2 dataset");
        assert!(controller.begin_optimize("other").is_none());
    }

    #[test]
    fn phase_follows_flags() {
        let state = UiState {
            has_searched: true,
            error: Some(SEARCH_FAILED_MESSAGE.into()),
            ..UiState::default()
        };
        assert_eq!(state.phase(), Phase::Failed);

        let state = UiState {
            has_searched: true,
            loading: true,
            ..UiState::default()
        };
        assert_eq!(state.phase(), Phase::Searching);
    }
}
