//! LLM Client abstractions and provider selection
//!
//! This module provides a unified interface for the chat providers the
//! pipeline can talk to:
//! - **OpenAI**: any OpenAI-compatible `/chat/completions` endpoint
//! - **Ollama**: a local Ollama server via `/api/chat`
//!
//! Each client sits behind a cargo feature of the same name (`openai`,
//! `ollama`); both are on by default.

use crate::types::{AppError, Result};
use crate::utils::toml_config::ProviderConfig;
use async_trait::async_trait;
use std::time::Duration;

/// JSON schema handed to a provider that supports constrained output.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    /// Short identifier for the schema (e.g. `ResearchPlan`)
    pub name: String,
    /// The JSON schema document
    pub schema: serde_json::Value,
}

/// Generic LLM client trait for provider abstraction
///
/// All LLM providers implement this trait, allowing for easy swapping
/// between providers without changing application code.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Generate a reply constrained to `schema`.
    ///
    /// Providers without native support fall back to plain generation with
    /// the schema appended to the system prompt.
    async fn generate_structured(
        &self,
        system: &str,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<String> {
        let system = format!(
            "{}\n\nRespond with a single JSON object that conforms to this JSON schema:\n{}",
            system, schema.schema
        );
        self.generate_with_system(&system, prompt).await
    }

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Provider enum for runtime selection
///
/// | Provider | Structured output |
/// |----------|-------------------|
/// | OpenAI | `response_format: json_schema` |
/// | Ollama | `format: <schema>` |
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API provider (including Azure OpenAI and compatible APIs)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: "sk-...".to_string(),
    ///     api_base: "https://api.openai.com/v1".to_string(),
    ///     model: "gpt-5-mini".to_string(),
    ///     temperature: 1.0,
    ///     timeout: Duration::from_secs(300),
    /// };
    /// ```
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
        temperature: f32,
        timeout: Duration,
    },

    /// Ollama local LLM provider
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Ollama {
    ///     base_url: "http://localhost:11434".to_string(),
    ///     model: "llama3.2".to_string(),
    ///     temperature: 0.7,
    ///     timeout: Duration::from_secs(300),
    /// };
    /// ```
    Ollama {
        base_url: String,
        model: String,
        temperature: f32,
        timeout: Duration,
    },
}

impl Provider {
    /// Build a provider from configuration, resolving the API key from the
    /// environment variable the config names.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        match config {
            ProviderConfig::OpenAI {
                api_key_env,
                api_base,
                model,
                temperature,
                timeout_secs,
            } => {
                let api_key = std::env::var(api_key_env)
                    .ok()
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| {
                        AppError::Config(format!(
                            "Environment variable '{}' is not set (required by the openai provider)",
                            api_key_env
                        ))
                    })?;

                Ok(Provider::OpenAI {
                    api_key,
                    api_base: api_base.clone(),
                    model: model.clone(),
                    temperature: *temperature,
                    timeout: Duration::from_secs(*timeout_secs),
                })
            }
            ProviderConfig::Ollama {
                base_url,
                model,
                temperature,
                timeout_secs,
            } => Ok(Provider::Ollama {
                base_url: base_url.clone(),
                model: model.clone(),
                temperature: *temperature,
                timeout: Duration::from_secs(*timeout_secs),
            }),
        }
    }

    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built, the
    /// Ollama base URL is invalid, or the provider's cargo feature is off.
    pub fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            #[cfg(feature = "openai")]
            Provider::OpenAI {
                api_key,
                api_base,
                model,
                temperature,
                timeout,
            } => Ok(Box::new(super::openai::OpenAIClient::new(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                *temperature,
                *timeout,
            )?)),

            #[cfg(feature = "ollama")]
            Provider::Ollama {
                base_url,
                model,
                temperature,
                timeout,
            } => Ok(Box::new(super::ollama::OllamaClient::new(
                base_url.clone(),
                model.clone(),
                *temperature,
                *timeout,
            )?)),

            #[cfg(not(feature = "openai"))]
            Provider::OpenAI { .. } => Err(feature_disabled("openai")),

            #[cfg(not(feature = "ollama"))]
            Provider::Ollama { .. } => Err(feature_disabled("ollama")),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAI { model, .. } | Provider::Ollama { model, .. } => model,
        }
    }
}

#[cfg(not(all(feature = "openai", feature = "ollama")))]
fn feature_disabled(provider: &str) -> AppError {
    AppError::Config(format!(
        "the '{0}' provider requires deep-research to be built with the `{0}` feature",
        provider
    ))
}

/// Build a reqwest client with the provider timeout applied.
#[cfg(any(feature = "openai", feature = "ollama"))]
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::LLM(format!("Failed to build HTTP client: {}", e)))
}
