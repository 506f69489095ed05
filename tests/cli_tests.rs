//! CLI Integration Tests for deep-research
//!
//! Tests the command-line interface: help, version, init and config. None of
//! these commands reach the network.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run deep-research with arguments
fn run_cli(args: &[&str], working_dir: Option<&Path>) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_deep-research"));
    cmd.args(args)
        .env_remove("DEEP_RESEARCH_CONFIG")
        .env_remove("RUST_LOG");

    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    cmd.output().expect("Failed to execute command")
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let output = run_cli(&["--help"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("research"));
    assert!(stdout.contains("ask"));
    assert!(stdout.contains("init"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_version_command() {
    let output = run_cli(&["--version"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("deep-research"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_research_help() {
    let output = run_cli(&["research", "--help"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("--no-seed"));
}

#[test]
fn test_missing_subcommand_fails() {
    let output = run_cli(&[], None);
    assert!(!output.status.success());
}

// =============================================================================
// Init Command Tests
// =============================================================================

#[test]
fn test_init_creates_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = run_cli(&["--no-color", "init", "--provider", "ollama"], Some(temp_dir.path()));

    assert!(output.status.success());
    // status output stays off stdout
    assert!(output.stdout.is_empty());

    let config = fs::read_to_string(temp_dir.path().join("deep-research.toml")).unwrap();
    assert!(config.contains("type = \"ollama\""));
    assert!(temp_dir.path().join(".env.example").exists());
}

#[test]
fn test_init_does_not_overwrite_without_force() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("deep-research.toml"), "# mine\n").unwrap();

    let output = run_cli(&["--no-color", "init"], Some(temp_dir.path()));
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already exists"));
    let config = fs::read_to_string(temp_dir.path().join("deep-research.toml")).unwrap();
    assert_eq!(config, "# mine\n");
}

#[test]
fn test_init_force_overwrites() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("deep-research.toml"), "# mine\n").unwrap();

    let output = run_cli(&["--no-color", "init", "--force"], Some(temp_dir.path()));
    assert!(output.status.success());

    let config = fs::read_to_string(temp_dir.path().join("deep-research.toml")).unwrap();
    assert!(config.contains("[research]"));
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
fn test_config_prints_effective_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        temp_dir.path().join("deep-research.toml"),
        "[llm]\ntype = \"ollama\"\nmodel = \"qwen3\"\n\n[research]\ncontent_limit = 3000\n",
    )
    .unwrap();

    let output = run_cli(&["--no-color", "config"], Some(temp_dir.path()));
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("content_limit = 3000"));
    assert!(stdout.contains("qwen3"));
}

#[test]
fn test_config_validate_rejects_bad_limits() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("bad.toml");
    fs::write(
        &path,
        "[llm]\ntype = \"ollama\"\n\n[research]\ncontent_limit = 100\nexcerpt_limit = 500\n",
    )
    .unwrap();

    let output = run_cli(
        &["--no-color", "--config", path.to_str().unwrap(), "config", "--validate"],
        None,
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("excerpt_limit"));
}

#[test]
fn test_config_validate_reports_missing_key() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("openai.toml");
    fs::write(
        &path,
        "[llm]\ntype = \"openai\"\napi_key_env = \"DEEP_RESEARCH_TEST_SURELY_UNSET_KEY\"\n",
    )
    .unwrap();

    let output = run_cli(
        &["--no-color", "--config", path.to_str().unwrap(), "config", "--validate"],
        None,
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DEEP_RESEARCH_TEST_SURELY_UNSET_KEY"));
}

#[test]
fn test_research_rejects_empty_query() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        temp_dir.path().join("deep-research.toml"),
        "[llm]\ntype = \"ollama\"\nbase_url = \"http://127.0.0.1:9\"\n\n[research]\nseed_search = false\n",
    )
    .unwrap();

    let output = run_cli(&["--no-color", "research", "   "], Some(temp_dir.path()));

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("query must not be empty"));
}
