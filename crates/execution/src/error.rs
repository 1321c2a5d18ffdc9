// In crates/execution/src/error.rs

use core_types::DateSpan;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Engine failed: {reason}")]
    EngineFailed { reason: String },

    #[error("API client error: {0}")]
    ApiClientError(#[from] api_client::Error),

    #[error("Malformed engine report: {0}")]
    MalformedReport(#[from] serde_json::Error),

    #[error("Partition task did not complete: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A sub-run failure, tagged with the partition it belongs to.
#[derive(Error, Debug)]
#[error("Partition {index} ({span}) failed: {source}")]
pub struct PartitionError {
    pub index: usize,
    pub span: DateSpan,
    #[source]
    pub source: Error,
}
