// In crates/core-types/src/error.rs

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid date span: from {from} is not before to {to}")]
    InvalidSpan {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
