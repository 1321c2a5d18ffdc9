// In crates/analytics/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The engine returned a report without a `performanceReport`. This means a
    /// failed sub-run slipped past the execution layer.
    #[error("Report for partition {index} has no performanceReport")]
    MissingPerformanceReport { index: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
