// In crates/app-config/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load configuration")]
    LoadError(#[from] config::ConfigError),

    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration does not match the expected shape: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("Missing required configuration field '{field}'")]
    MissingField { field: &'static str },

    #[error("Invalid value for configuration field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
