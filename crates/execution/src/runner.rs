// In crates/execution/src/runner.rs

use std::sync::Arc;

use analytics::ResultReport;
use core_types::RunMode;
use futures::future;

use crate::{ComputeEngine, Error, PartitionError, PartitionRequest};

/// Runs every partition request on `engine` and returns the reports in
/// request order.
///
/// With `synchronous` set, partitions run one at a time and logs stay in
/// chronological order. Otherwise all partitions are spawned at once; no
/// throttling is applied here, admission control belongs to the engine.
/// Either way the first failure aborts the whole batch.
pub async fn run_partitions(
    engine: Arc<dyn ComputeEngine>,
    mode: &RunMode,
    requests: Vec<PartitionRequest>,
    synchronous: bool,
) -> Result<Vec<ResultReport>, PartitionError> {
    tracing::info!(
        engine = engine.name(),
        partitions = requests.len(),
        synchronous,
        %mode,
        "Dispatching partitions."
    );

    if synchronous {
        run_sequential(engine.as_ref(), mode, requests).await
    } else {
        run_concurrent(engine, mode, requests).await
    }
}

async fn run_sequential(
    engine: &dyn ComputeEngine,
    mode: &RunMode,
    requests: Vec<PartitionRequest>,
) -> Result<Vec<ResultReport>, PartitionError> {
    let total = requests.len();
    let mut reports = Vec::with_capacity(total);

    for request in requests {
        let (index, span) = (request.index, request.span);
        tracing::info!(index, total, %span, "Running partition.");

        match engine.run(mode, request).await {
            Ok(report) => {
                tracing::info!(index, total, "Partition finished.");
                reports.push(report);
            }
            Err(source) => {
                tracing::error!(index, %span, error = %source, "Partition failed, aborting batch.");
                return Err(PartitionError { index, span, source });
            }
        }
    }

    Ok(reports)
}

async fn run_concurrent(
    engine: Arc<dyn ComputeEngine>,
    mode: &RunMode,
    requests: Vec<PartitionRequest>,
) -> Result<Vec<ResultReport>, PartitionError> {
    // --- 1. Spawn one task per partition ---
    let tasks: Vec<_> = requests
        .into_iter()
        .map(|request| {
            let engine = Arc::clone(&engine);
            let mode = mode.clone();
            let (index, span) = (request.index, request.span);
            let handle = tokio::spawn(async move { engine.run(&mode, request).await });
            (index, span, handle)
        })
        .collect();
    let abort_handles: Vec<_> = tasks.iter().map(|(_, _, handle)| handle.abort_handle()).collect();

    // --- 2. Join in request order, first failure wins ---
    let joined = future::try_join_all(tasks.into_iter().map(|(index, span, handle)| async move {
        let source = match handle.await {
            Ok(Ok(report)) => {
                tracing::info!(index, "Partition finished.");
                return Ok(report);
            }
            Ok(Err(error)) => error,
            Err(join_error) => Error::TaskFailed(join_error.to_string()),
        };
        tracing::error!(index, %span, error = %source, "Partition failed, aborting batch.");
        Err(PartitionError { index, span, source })
    }))
    .await;

    // --- 3. Tear down whatever is still in flight ---
    if joined.is_err() {
        for handle in &abort_handles {
            handle.abort();
        }
    }

    joined
}
