//! Research stage: one concurrent search-and-fetch task per planned angle.

use crate::tools::{EvidenceFetcher, SearchProvider};
use crate::types::{AngleDiagnostics, AngleNotes, ResearchAngle, ResearchPlan, SourceNote};
use crate::utils::text::truncate_chars;
use crate::utils::toml_config::ResearchConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, info_span, warn, Instrument};

/// Notes and diagnostics for every planned angle, both in plan order.
#[derive(Debug, Clone, Default)]
pub struct ResearchOutcome {
    pub notes: Vec<AngleNotes>,
    pub diagnostics: Vec<AngleDiagnostics>,
}

impl ResearchOutcome {
    pub fn degraded_angles(&self) -> impl Iterator<Item = &AngleDiagnostics> {
        self.diagnostics.iter().filter(|d| d.is_degraded())
    }
}

#[derive(Debug, Clone, Copy)]
struct AngleLimits {
    search_results: usize,
    pages: usize,
    content_limit: usize,
    fetch_timeout: Duration,
}

#[derive(Clone)]
pub struct Researcher {
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn EvidenceFetcher>,
    limits: AngleLimits,
}

impl Researcher {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn EvidenceFetcher>,
        config: &ResearchConfig,
    ) -> Self {
        Self {
            search,
            fetcher,
            limits: AngleLimits {
                search_results: config.search_results_per_angle,
                pages: config.pages_per_angle,
                content_limit: config.content_limit,
                fetch_timeout: config.fetch_timeout(),
            },
        }
    }

    /// Notes for every angle of `plan`, in plan order.
    pub async fn research(&self, plan: &ResearchPlan) -> Vec<AngleNotes> {
        self.research_with_diagnostics(plan).await.notes
    }

    /// Fan out one task per angle and wait for all of them.
    ///
    /// The result always holds exactly one record per planned angle. An angle
    /// whose task dies is replaced by an empty record and flagged in its
    /// diagnostics.
    pub async fn research_with_diagnostics(&self, plan: &ResearchPlan) -> ResearchOutcome {
        let mut set = JoinSet::new();

        for (idx, angle) in plan.angles.iter().enumerate() {
            let search = Arc::clone(&self.search);
            let fetcher = Arc::clone(&self.fetcher);
            let limits = self.limits;
            let entity = plan.entity_name.clone();
            let angle = angle.clone();
            let span = info_span!("angle", index = idx, keyword = %angle.keyword);

            set.spawn(
                async move {
                    let result = research_angle(search, fetcher, limits, &entity, angle).await;
                    (idx, result)
                }
                .instrument(span),
            );
        }

        let mut slots: Vec<Option<(AngleNotes, AngleDiagnostics)>> =
            (0..plan.angles.len()).map(|_| None).collect();

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, result)) => slots[idx] = Some(result),
                Err(e) => warn!(error = %e, "angle task failed"),
            }
        }

        let mut outcome = ResearchOutcome::default();
        for (slot, angle) in slots.into_iter().zip(&plan.angles) {
            let (notes, diagnostics) = slot.unwrap_or_else(|| failed_angle(angle));
            outcome.notes.push(notes);
            outcome.diagnostics.push(diagnostics);
        }

        outcome
    }
}

fn failed_angle(angle: &ResearchAngle) -> (AngleNotes, AngleDiagnostics) {
    (
        AngleNotes::empty(angle),
        AngleDiagnostics {
            angle: angle.keyword.clone(),
            task_failed: Some("angle task did not complete".to_string()),
            ..Default::default()
        },
    )
}

async fn research_angle(
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn EvidenceFetcher>,
    limits: AngleLimits,
    entity: &str,
    angle: ResearchAngle,
) -> (AngleNotes, AngleDiagnostics) {
    let query = format!("{} {}", entity, angle.keyword);
    info!(query = %query, "searching");

    let mut diagnostics = AngleDiagnostics {
        angle: angle.keyword.clone(),
        ..Default::default()
    };

    let results = search.search(&query, limits.search_results).await;
    diagnostics.search_degraded = results.reason().map(str::to_string);

    let mut notes = Vec::with_capacity(limits.pages);
    for hit in results.into_value().into_iter().take(limits.pages) {
        let fetched = fetcher.fetch(&hit.href, limits.fetch_timeout).await;
        if fetched.is_degraded() {
            diagnostics.fetch_failures += 1;
        }

        let content = fetched.into_value();
        notes.push(SourceNote {
            title: hit.title,
            url: hit.href,
            snippet: hit.body,
            full_content: truncate_chars(&content, limits.content_limit).to_string(),
        });
    }

    diagnostics.notes = notes.len();
    debug!(
        notes = notes.len(),
        fetch_failures = diagnostics.fetch_failures,
        "angle complete"
    );

    (
        AngleNotes {
            angle: angle.keyword,
            reason: angle.reason,
            notes,
        },
        diagnostics,
    )
}
