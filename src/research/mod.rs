//! Deep Research Pipeline
//!
//! This module turns a free-form query (a ticker such as `NVDA` or a general
//! topic) into a cited markdown report.
//!
//! # Architecture
//!
//! The pipeline uses a coordinator pattern:
//! - [`coordinator::ResearchCoordinator`] - Orchestrates one run end to end
//! - [`planner::Planner`] - Resolves the entity and picks research angles
//! - [`researcher::Researcher`] - Fans out one search-and-fetch task per angle
//! - [`synthesizer::Synthesizer`] - Aggregates notes into a structured report
//! - [`formatter::format_report`] - Renders the report as markdown
//!
//! # Usage
//!
//! ```ignore
//! use deep_research::research::coordinator::{ResearchCoordinator, ResearchServices};
//!
//! let services = ResearchServices::from_config(&config)?;
//! let coordinator = ResearchCoordinator::new(services, config.research.clone());
//!
//! let document = coordinator.run_deep_research("NVDA").await?;
//! println!("{}", document);
//! ```
//!
//! # Research Workflow
//!
//! 1. **Seed Search** - Optional small search to ground the planner
//! 2. **Planning** - Entity, context and 3-4 angles
//! 3. **Research** - Parallel search and page fetch per angle
//! 4. **Synthesis** - Structured, cited report
//! 5. **Citation Audit** - Cited URLs checked against gathered notes
//! 6. **Formatting** - Deterministic markdown

/// Citation grounding audit.
pub mod citations;
/// Pipeline coordination.
pub mod coordinator;
/// Markdown rendering.
pub mod formatter;
/// Angle planning.
pub mod planner;
/// Parallel evidence gathering.
pub mod researcher;
/// Report synthesis.
pub mod synthesizer;

#[cfg(test)]
pub(crate) mod test_support;

pub use coordinator::{ResearchCoordinator, ResearchRun, ResearchServices};
pub use researcher::ResearchOutcome;
