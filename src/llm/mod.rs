//! LLM Provider Clients and Abstractions
//!
//! This module provides a unified interface for interacting with the chat
//! providers the pipeline uses. It abstracts provider-specific HTTP APIs
//! behind a common trait so the research stages work with any of them.
//!
//! # Architecture
//!
//! - [`LLMClient`] - The core trait that all providers implement
//! - [`Provider`] - Runtime provider selection, built from configuration
//! - [`StructuredGenerator`] - Schema-validated generation on top of any client
//!
//! # Example
//!
//! ```ignore
//! use deep_research::llm::{Provider, StructuredGenerator};
//! use std::sync::Arc;
//!
//! let provider = Provider::from_config(&config.llm)?;
//! let generator = StructuredGenerator::new(Arc::from(provider.create_client()?));
//! let plan: ResearchPlan = generator.generate(INSTRUCTIONS, "NVDA").await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// Ollama `/api/chat` client (ollama-rs).
#[cfg(feature = "ollama")]
pub mod ollama;
/// OpenAI-compatible chat completions client (async-openai).
#[cfg(feature = "openai")]
pub mod openai;
/// Schema-constrained generation and output validation.
pub mod structured;

pub use client::{LLMClient, OutputSchema, Provider};
pub use structured::{StructuredGenerator, StructuredOutput};
