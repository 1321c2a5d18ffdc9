// In crates/execution/src/lib.rs

use analytics::ResultReport;
use async_trait::async_trait;
use core_types::RunMode;

pub mod error;
pub mod remote;
pub mod runner;
pub mod types;

// Re-export public types
pub use error::{Error, PartitionError, Result};
pub use runner::run_partitions;
pub use types::PartitionRequest;

/// The universal interface for a compute engine.
///
/// A `ComputeEngine` executes one sub-run for one partition and returns the
/// engine's report. It is treated as a black box: it may be a remote service,
/// a child process or an in-process simulator.
#[async_trait]
pub trait ComputeEngine: Send + Sync {
    /// The name of the engine (e.g., "RemoteEngine").
    fn name(&self) -> &'static str;

    /// Executes a single partition request.
    ///
    /// The request is moved in: whatever the engine does to it stays local to
    /// this invocation.
    async fn run(&self, mode: &RunMode, request: PartitionRequest) -> Result<ResultReport>;
}
