//! # deep-research
//!
//! Turns a stock ticker or a free-form question into a structured, cited
//! markdown report through a four-stage pipeline: plan, parallel research,
//! synthesize, format.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use deep_research::{DeepResearchConfig, ResearchCoordinator, ResearchServices};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DeepResearchConfig::load_or_default(None)?;
//!     let services = ResearchServices::from_config(&config)?;
//!     let coordinator = ResearchCoordinator::new(services, config.research.clone());
//!
//!     let document = coordinator.run_deep_research("NVDA").await?;
//!     println!("{}", document);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Custom providers
//!
//! Every leaf of the pipeline is a trait object, so search, fetch and the LLM
//! can be swapped without touching the stages:
//!
//! ```rust,ignore
//! use deep_research::{ResearchServices, tools::{DuckDuckGoSearch, PageFetcher}};
//! use std::sync::Arc;
//!
//! let services = ResearchServices::new(
//!     my_llm,                                   // Arc<dyn LLMClient>
//!     Arc::new(DuckDuckGoSearch::default()),
//!     Arc::new(PageFetcher::new(5000)),
//! );
//! ```
//!
//! ## Modules
//!
//! - [`research`] - Planner, researcher, synthesizer, formatter and coordinator
//! - [`llm`] - LLM clients and schema-constrained generation
//! - [`tools`] - Search and page-fetch providers
//! - [`agents`] - Single-turn short answer agent
//! - [`cli`] - Command-line parsing and output helpers
//! - [`types`] - Data model and error handling
//! - [`utils`] - Configuration, logging and text helpers

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Single-turn agents.
pub mod agents;
/// Command-line interface.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// The deep research pipeline.
pub mod research;
/// Search and fetch providers.
pub mod tools;
/// Core types (plan, notes, report, errors).
pub mod types;
/// Configuration, logging and text utilities.
pub mod utils;

// Re-export commonly used types
pub use agents::{Agent, QuickAnswerAgent};
pub use llm::{LLMClient, Provider, StructuredGenerator};
pub use research::{ResearchCoordinator, ResearchRun, ResearchServices};
pub use types::{AppError, ResearchPlan, ResearchReport, Result};
pub use utils::toml_config::DeepResearchConfig;
