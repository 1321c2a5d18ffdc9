// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use serde_json::Value;

pub mod batch;
pub mod error;
pub mod merge;
pub mod types;

// Re-export the most important types for easy access.
pub use batch::BatchOptions;
pub use error::{Error, Result};
pub use merge::{deep_merge, set_path};
pub use types::{AppSettings, BatchSettings, EngineSettings, Settings};

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings() -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        .add_source(File::with_name("config/base"))
        .add_source(File::with_name(&format!("config/{}", environment)).required(false))
        // e.g. `APP_ENGINE__BASE_URL=...`
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let settings: Settings = settings.try_deserialize()?;

    Ok(settings)
}

/// Loads the base simulation configuration that every batch starts from.
///
/// The file is TOML on disk but is handled as a JSON mapping from here on,
/// since overrides arrive as JSON and the engine consumes JSON.
pub fn load_base_config(path: &str) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    parse_base_config(&content)
}

fn parse_base_config(content: &str) -> Result<Value> {
    let config: Value = toml::from_str(content)?;
    if !config.is_object() {
        return Err(Error::InvalidField {
            field: "base_config",
            reason: "expected a table at the top level".to_string(),
        });
    }
    Ok(config)
}
