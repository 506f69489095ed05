//! Init command implementation
//!
//! Writes a commented `deep-research.toml` and a `.env.example` into a
//! directory.

use super::output::Output;
use super::ProviderChoice;
use crate::utils::toml_config::DEFAULT_CONFIG_FILE;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug, PartialEq, Eq)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// A configuration file already exists
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// LLM provider to configure
    pub provider: ProviderChoice,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing deep-research");

    let base_path = &config.path;

    if !base_path.exists() {
        if let Err(e) = fs::create_dir_all(base_path) {
            output.error(&format!("Failed to create {}: {}", base_path.display(), e));
            return InitResult::Error(e.to_string());
        }
    }

    let config_path = base_path.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() && !config.force {
        output.warning(&format!("{} already exists!", DEFAULT_CONFIG_FILE));
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let toml_content = generate_config_toml(config.provider);
    if let Err(e) = write_file(&config_path, &toml_content, config.force) {
        output.error(&format!("Failed to create {}: {}", DEFAULT_CONFIG_FILE, e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", DEFAULT_CONFIG_FILE);

    let env_example_path = base_path.join(".env.example");
    if env_example_path.exists() && !config.force {
        output.skipped(".env.example", "already exists");
    } else if let Err(e) = write_file(&env_example_path, &generate_env_example(), config.force) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    } else {
        output.created("env", ".env.example");
    }

    output.success("deep-research initialized");
    output.header("Next Steps");

    match config.provider {
        ProviderChoice::Openai => {
            output.info("1. Set your OpenAI API key:");
            output.command("cp .env.example .env");
            output.command("# Edit .env and set OPENAI_API_KEY");
        }
        ProviderChoice::Ollama => {
            output.info("1. Start Ollama (if not running):");
            output.command("ollama serve");
            output.command("ollama pull llama3.2");
        }
    }

    output.info("2. Run a report:");
    output.command("deep-research research NVDA");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_config_toml(provider: ProviderChoice) -> String {
    let llm_section = match provider {
        ProviderChoice::Openai => {
            r#"# OpenAI-compatible chat completions (set OPENAI_API_KEY in .env)
[llm]
type = "openai"
api_key_env = "OPENAI_API_KEY"
api_base = "https://api.openai.com/v1"
model = "gpt-5-mini"
temperature = 1.0
timeout_secs = 300
"#
        }
        ProviderChoice::Ollama => {
            r#"# Ollama - Local inference (no API key required)
[llm]
type = "ollama"
base_url = "http://localhost:11434"
model = "llama3.2"
temperature = 0.7
timeout_secs = 300
"#
        }
    };

    format!(
        r#"# deep-research configuration
# ============================

[logging]
# Default filter; RUST_LOG overrides it
level = "info"
# "pretty" or "json"
format = "pretty"

{llm_section}
[research]
# Search results requested per angle
search_results_per_angle = 3
# Top results fetched and read per angle
pages_per_angle = 2
# Characters kept from each fetched page
content_limit = 5000
# Characters of each page shown to the writer (must be <= content_limit)
excerpt_limit = 1000
fetch_timeout_secs = 10
search_timeout_secs = 15
# Small exploratory search that grounds the planner
seed_search = true
seed_results = 3
# Expected number of research angles
min_angles = 3
max_angles = 4
# What to do when the planner proposes too many or too few angles: warn, clamp, strict
angle_policy = "warn"
# What to do when a cited URL was never gathered: off, warn, strict
citation_policy = "warn"
"#,
        llm_section = llm_section,
    )
}

fn generate_env_example() -> String {
    r#"# deep-research Environment Variables
# ===================================
# Copy this file to .env and fill in the values.

# Required for the openai provider
OPENAI_API_KEY=sk-your-key-here

# Optional: Logging level (trace, debug, info, warn, error)
RUST_LOG=info,deep_research=debug

# Optional: Default configuration file
# DEEP_RESEARCH_CONFIG=deep-research.toml
"#
    .to_string()
}
