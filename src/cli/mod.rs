//! CLI module for deep-research
//!
//! Provides command-line interface parsing and handling for the deep-research binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// deep-research - cited research reports for tickers and topics
///
/// Plans research angles with an LLM, searches and reads the web for each
/// angle in parallel, and synthesizes a structured markdown report.
#[derive(Parser, Debug)]
#[command(
    name = "deep-research",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Deep research reports for stock tickers and general topics",
    long_about = "Plans 3-4 research angles for a query, searches and reads the web for each\n\
                  angle in parallel, then synthesizes a structured, cited markdown report.\n\n\
                  The report is written to stdout; progress and diagnostics go to stderr.",
    after_help = "EXAMPLES:\n    \
                  deep-research init                         # Write deep-research.toml and .env.example\n    \
                  deep-research research NVDA                # Research a ticker\n    \
                  deep-research research \"SpaceX Starship progress\" -o report.md\n    \
                  deep-research ask \"What is the capital of France?\"\n    \
                  deep-research --config my.toml config --validate"
)]
pub struct Cli {
    /// Path to the configuration file (defaults to ./deep-research.toml when present)
    #[arg(short, long, global = true, env = "DEEP_RESEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full research pipeline and print a markdown report
    Research {
        /// Stock ticker (e.g. NVDA) or free-form question
        query: String,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the exploratory search that grounds the planner
        #[arg(long)]
        no_seed: bool,
    },

    /// Ask a single question and get a short answer
    Ask {
        /// The question to answer
        question: String,
    },

    /// Initialize a configuration in a directory
    ///
    /// Creates deep-research.toml and .env.example.
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// LLM provider to configure
        #[arg(long, value_enum, default_value_t = ProviderChoice::Openai)]
        provider: ProviderChoice,
    },

    /// Show the effective configuration
    Config {
        /// Validate the configuration, including required environment variables
        #[arg(long)]
        validate: bool,
    },
}

/// Provider written by `init`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderChoice {
    Openai,
    Ollama,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
