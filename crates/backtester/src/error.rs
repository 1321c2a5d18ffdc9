// In crates/backtester/src/error.rs

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Raised before any partition is dispatched.
    #[error("Invalid batch configuration: {0}")]
    Configuration(#[from] app_config::Error),

    #[error("Batch aborted after {elapsed:?}: {source}")]
    PartitionExecution {
        index: usize,
        elapsed: Duration,
        #[source]
        source: execution::PartitionError,
    },

    #[error("Failed to aggregate partition reports: {0}")]
    Aggregation(#[from] analytics::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
