//! Search provider implementation using daedra
//!
//! This module provides web search capabilities via the daedra crate,
//! which uses DuckDuckGo as the search backend.

use crate::types::{LeafOutcome, SearchHit};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of ordered web search results.
///
/// Implementations never fail: any fault collapses to
/// [`LeafOutcome::Degraded`] with an empty result set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> LeafOutcome<Vec<SearchHit>>;
}

/// Web search powered by daedra
pub struct DuckDuckGoSearch {
    timeout: Duration,
}

impl DuckDuckGoSearch {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for DuckDuckGoSearch {
    fn default() -> Self {
        Self::new(Duration::from_secs(15))
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> LeafOutcome<Vec<SearchHit>> {
        if max_results == 0 {
            return LeafOutcome::Data(Vec::new());
        }

        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: max_results,
                ..Default::default()
            }),
        };

        let outcome = tokio::time::timeout(
            self.timeout,
            daedra::tools::search::perform_search(&search_args),
        )
        .await;

        match outcome {
            Ok(Ok(response)) => {
                let hits: Vec<SearchHit> = response
                    .data
                    .iter()
                    .take(max_results)
                    .map(|r| SearchHit {
                        title: r.title.clone(),
                        href: r.url.clone(),
                        body: r.description.clone(),
                    })
                    .collect();

                debug!(query = %query, count = hits.len(), "search complete");
                LeafOutcome::Data(hits)
            }
            Ok(Err(e)) => {
                warn!(query = %query, error = %e, "search failed, continuing with no results");
                LeafOutcome::degraded(Vec::new(), format!("search failed: {}", e))
            }
            Err(_) => {
                warn!(
                    query = %query,
                    timeout_secs = self.timeout.as_secs(),
                    "search timed out, continuing with no results"
                );
                LeafOutcome::degraded(
                    Vec::new(),
                    format!("search timed out after {}s", self.timeout.as_secs()),
                )
            }
        }
    }
}

/// Render hits as the compact lines used to ground the planner.
pub fn format_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| format!("- {} ({}): {}", hit.title, hit.href, hit.body))
        .collect::<Vec<_>>()
        .join("\n")
}
