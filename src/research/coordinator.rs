use crate::{
    llm::{LLMClient, Provider, StructuredGenerator},
    research::{
        citations::{enforce_citations, CitationFinding},
        formatter::format_report,
        planner::Planner,
        researcher::Researcher,
        synthesizer::Synthesizer,
    },
    tools::{DuckDuckGoSearch, EvidenceFetcher, PageFetcher, SearchProvider},
    types::{
        AngleDiagnostics, AngleNotes, AppError, ResearchPlan, ResearchReport, Result, SearchHit,
    },
    utils::toml_config::{DeepResearchConfig, ResearchConfig},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn, Span};
use uuid::Uuid;

/// Upper bound on exploratory results handed to the planner.
const MAX_SEED_RESULTS: usize = 3;

/// Long-lived handles shared by every stage of a run.
#[derive(Clone)]
pub struct ResearchServices {
    pub generator: Arc<StructuredGenerator>,
    pub search: Arc<dyn SearchProvider>,
    pub fetcher: Arc<dyn EvidenceFetcher>,
}

impl ResearchServices {
    pub fn new(
        llm: Arc<dyn LLMClient>,
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn EvidenceFetcher>,
    ) -> Self {
        Self {
            generator: Arc::new(StructuredGenerator::new(llm)),
            search,
            fetcher,
        }
    }

    /// Build the production services: the configured LLM provider, DuckDuckGo
    /// search and the daedra page fetcher.
    pub fn from_config(config: &DeepResearchConfig) -> Result<Self> {
        let provider = Provider::from_config(&config.llm)?;
        let llm: Arc<dyn LLMClient> = Arc::from(provider.create_client()?);

        info!(provider = provider.name(), model = provider.model(), "LLM provider ready");

        let search = Arc::new(DuckDuckGoSearch::new(config.research.search_timeout()));
        let fetcher = Arc::new(PageFetcher::new(config.research.content_limit));

        Ok(Self::new(llm, search, fetcher))
    }
}

/// Everything one pipeline invocation produced.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchRun {
    pub run_id: Uuid,
    pub query: String,
    pub plan: ResearchPlan,
    pub notes: Vec<AngleNotes>,
    pub report: ResearchReport,
    pub document: String,
    pub diagnostics: Vec<AngleDiagnostics>,
    pub citation_findings: Vec<CitationFinding>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ResearchRun {
    pub fn degraded_angles(&self) -> impl Iterator<Item = &AngleDiagnostics> {
        self.diagnostics.iter().filter(|d| d.is_degraded())
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Runs plan, research, synthesis and formatting for a query.
pub struct ResearchCoordinator {
    services: ResearchServices,
    config: ResearchConfig,
    planner: Planner,
    researcher: Researcher,
    synthesizer: Synthesizer,
}

impl ResearchCoordinator {
    pub fn new(services: ResearchServices, config: ResearchConfig) -> Self {
        let planner = Planner::new(Arc::clone(&services.generator), &config);
        let researcher = Researcher::new(
            Arc::clone(&services.search),
            Arc::clone(&services.fetcher),
            &config,
        );
        let synthesizer = Synthesizer::new(Arc::clone(&services.generator), config.excerpt_limit);

        Self {
            services,
            config,
            planner,
            researcher,
            synthesizer,
        }
    }

    /// Enable or disable the exploratory search that grounds the planner.
    pub fn with_seed_search(mut self, enabled: bool) -> Self {
        self.config.seed_search = enabled;
        self
    }

    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    /// Execute deep research on a query and return the markdown document.
    pub async fn run_deep_research(&self, query: &str) -> Result<String> {
        Ok(self.run(query).await?.document)
    }

    /// Execute deep research on a query and return the full run record.
    ///
    /// Planning and synthesis failures are fatal; search and fetch faults only
    /// degrade the evidence and are reported in [`ResearchRun::diagnostics`].
    #[instrument(name = "research_run", skip(self), fields(run_id = tracing::field::Empty))]
    pub async fn run(&self, query: &str) -> Result<ResearchRun> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput("query must not be empty".to_string()));
        }

        let run_id = Uuid::new_v4();
        Span::current().record("run_id", tracing::field::display(run_id));
        let started_at = Utc::now();

        info!(query = %query, "starting research");

        let seed = self.seed_search(query).await;
        let plan = self.planner.plan(query, seed.as_deref()).await?;

        let outcome = self.researcher.research_with_diagnostics(&plan).await;
        let degraded = outcome.degraded_angles().count();
        if degraded > 0 {
            warn!(
                degraded,
                total = outcome.diagnostics.len(),
                "some angles gathered degraded evidence"
            );
        }

        let report = self.synthesizer.synthesize(&plan, &outcome.notes).await?;
        let citation_findings =
            enforce_citations(self.config.citation_policy, &report, &outcome.notes)?;

        let document = format_report(&plan, &report);
        let finished_at = Utc::now();

        info!(
            entity = %plan.entity_name,
            sections = report.sections.len(),
            document_chars = document.chars().count(),
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            "research complete"
        );

        Ok(ResearchRun {
            run_id,
            query: query.to_string(),
            plan,
            notes: outcome.notes,
            report,
            document,
            diagnostics: outcome.diagnostics,
            citation_findings,
            started_at,
            finished_at,
        })
    }

    async fn seed_search(&self, query: &str) -> Option<Vec<SearchHit>> {
        let count = self.config.seed_results.min(MAX_SEED_RESULTS);
        if !self.config.seed_search || count == 0 {
            return None;
        }

        let outcome = self.services.search.search(query, count).await;
        if let Some(reason) = outcome.reason() {
            warn!(reason = %reason, "seed search degraded, planning without it");
            return None;
        }

        Some(outcome.into_value())
    }
}
