//! TOML-based configuration for deep-research
//!
//! Every field has a default, so an absent file or an empty table yields a
//! runnable configuration. Secrets are never stored in the file: providers
//! name the environment variable that holds them, and `.env` files are loaded
//! through `dotenvy` by the binary before the config is read.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "deep-research.toml";

/// Root configuration structure loaded from deep-research.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeepResearchConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub llm: ProviderConfig,

    #[serde(default)]
    pub research: ResearchConfig,
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default = "default_ollama_model")]
        model: String,
        #[serde(default = "default_temperature")]
        temperature: f32,
        #[serde(default = "default_llm_timeout")]
        timeout_secs: u64,
    },
    OpenAI {
        /// Environment variable containing API key
        #[serde(default = "default_openai_key_env")]
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        #[serde(default = "default_openai_model")]
        model: String,
        #[serde(default = "default_temperature")]
        temperature: f32,
        #[serde(default = "default_llm_timeout")]
        timeout_secs: u64,
    },
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-5-mini".to_string()
}

fn default_temperature() -> f32 {
    1.0
}

fn default_llm_timeout() -> u64 {
    300
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::OpenAI {
            api_key_env: default_openai_key_env(),
            api_base: default_openai_base(),
            model: default_openai_model(),
            temperature: default_temperature(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl ProviderConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderConfig::Ollama { .. } => "ollama",
            ProviderConfig::OpenAI { .. } => "openai",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ProviderConfig::Ollama { model, .. } | ProviderConfig::OpenAI { model, .. } => model,
        }
    }
}

// ============= Research Configuration =============

/// What to do when the planner proposes an angle count outside the bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnglePolicy {
    /// Accept the plan and log the deviation
    #[default]
    Warn,
    /// Drop angles beyond `max_angles`; fewer than `min_angles` is only logged
    Clamp,
    /// Reject the plan
    Strict,
}

/// How to treat facts whose source URL does not appear in the gathered notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationPolicy {
    Off,
    #[default]
    Warn,
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    #[serde(default = "default_search_results")]
    pub search_results_per_angle: usize,

    #[serde(default = "default_pages_per_angle")]
    pub pages_per_angle: usize,

    /// Max characters kept from a fetched page
    #[serde(default = "default_content_limit")]
    pub content_limit: usize,

    /// Max characters of page content placed in the synthesis context
    #[serde(default = "default_excerpt_limit")]
    pub excerpt_limit: usize,

    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_search_timeout")]
    pub search_timeout_secs: u64,

    /// Run a small exploratory search before planning
    #[serde(default = "default_true")]
    pub seed_search: bool,

    #[serde(default = "default_seed_results")]
    pub seed_results: usize,

    #[serde(default = "default_min_angles")]
    pub min_angles: usize,

    #[serde(default = "default_max_angles")]
    pub max_angles: usize,

    #[serde(default)]
    pub angle_policy: AnglePolicy,

    #[serde(default)]
    pub citation_policy: CitationPolicy,
}

fn default_search_results() -> usize {
    3
}

fn default_pages_per_angle() -> usize {
    2
}

fn default_content_limit() -> usize {
    5000
}

fn default_excerpt_limit() -> usize {
    1000
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_search_timeout() -> u64 {
    15
}

fn default_true() -> bool {
    true
}

fn default_seed_results() -> usize {
    3
}

fn default_min_angles() -> usize {
    3
}

fn default_max_angles() -> usize {
    4
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            search_results_per_angle: default_search_results(),
            pages_per_angle: default_pages_per_angle(),
            content_limit: default_content_limit(),
            excerpt_limit: default_excerpt_limit(),
            fetch_timeout_secs: default_fetch_timeout(),
            search_timeout_secs: default_search_timeout(),
            seed_search: default_true(),
            seed_results: default_seed_results(),
            min_angles: default_min_angles(),
            max_angles: default_max_angles(),
            angle_policy: AnglePolicy::default(),
            citation_policy: CitationPolicy::default(),
        }
    }
}

impl ResearchConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl From<ConfigError> for crate::types::AppError {
    fn from(err: ConfigError) -> Self {
        crate::types::AppError::Config(err.to_string())
    }
}

impl DeepResearchConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Load from an explicit path, or from the default file if it exists,
    /// falling back to built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = Self::read_or_default(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`load_or_default`](Self::load_or_default) but only checks the
    /// research bounds, so it works before secrets are in place.
    pub fn read_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::FileNotFound(path.to_path_buf()))
            }
            Some(path) => path,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if !default_path.exists() {
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let config = Self::from_toml(&fs::read_to_string(path)?)?;
        config.validate_limits()?;
        Ok(config)
    }

    /// Parse without validation
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate internal consistency and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_limits()?;

        if let ProviderConfig::OpenAI { api_key_env, .. } = &self.llm {
            self.validate_env_var(api_key_env)?;
        }

        Ok(())
    }

    /// Validate the research bounds only (no environment access)
    pub fn validate_limits(&self) -> Result<(), ConfigError> {
        let r = &self.research;

        if r.search_results_per_angle == 0 {
            return Err(ConfigError::ValidationError(
                "research.search_results_per_angle must be at least 1".to_string(),
            ));
        }
        if r.pages_per_angle > r.search_results_per_angle {
            return Err(ConfigError::ValidationError(format!(
                "research.pages_per_angle ({}) cannot exceed search_results_per_angle ({})",
                r.pages_per_angle, r.search_results_per_angle
            )));
        }
        if r.content_limit == 0 {
            return Err(ConfigError::ValidationError(
                "research.content_limit must be at least 1".to_string(),
            ));
        }
        if r.excerpt_limit > r.content_limit {
            return Err(ConfigError::ValidationError(format!(
                "research.excerpt_limit ({}) cannot exceed content_limit ({})",
                r.excerpt_limit, r.content_limit
            )));
        }
        if r.seed_results > 3 {
            return Err(ConfigError::ValidationError(format!(
                "research.seed_results ({}) cannot exceed 3",
                r.seed_results
            )));
        }
        if r.min_angles > r.max_angles {
            return Err(ConfigError::ValidationError(format!(
                "research.min_angles ({}) cannot exceed max_angles ({})",
                r.min_angles, r.max_angles
            )));
        }
        if r.fetch_timeout_secs == 0 || r.search_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "research timeouts must be at least 1 second".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        self.resolve_env(name)
            .map(|_| ())
            .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
    }

    /// Resolve an environment variable referenced by name; empty values count as unset
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.is_empty())
    }

    /// Render the effective configuration back to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ValidationError(format!("Failed to serialize config: {}", e)))
    }
}
