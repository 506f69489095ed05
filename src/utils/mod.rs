/// Tracing subscriber setup.
pub mod logging;
/// Character-safe text helpers.
pub mod text;
/// TOML configuration loading and validation.
pub mod toml_config;
