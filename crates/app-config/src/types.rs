// In crates/app-config/src/types.rs

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Where the compute engine lives and how long a sub-run may take.
    pub engine: EngineSettings,
    #[serde(default)]
    pub batch: BatchSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct EngineSettings {
    /// The REST base URL of the compute engine.
    pub base_url: String,
    /// Upper bound for a single sub-run request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BatchSettings {
    /// Path of the base simulation configuration (TOML).
    #[serde(default = "default_base_config")]
    pub base_config: String,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self { base_config: default_base_config() }
    }
}

/// Helper functions for serde defaults
fn default_timeout_secs() -> u64 { 600 }
fn default_base_config() -> String { "config/gekko.toml".to_string() }
