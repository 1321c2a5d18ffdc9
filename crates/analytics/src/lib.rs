// In crates/analytics/src/lib.rs

pub mod aggregator;
pub mod error;
pub mod types;

pub use aggregator::{aggregate_batch, aggregate_performance, summarize};
pub use error::{Error, Result};
pub use types::{
    AggregatePerformanceReport, BatchReport, PartitionStats, PerformanceReport, ResultReport,
    SummaryReport,
};
