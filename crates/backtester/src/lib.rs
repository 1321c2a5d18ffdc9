// In crates/backtester/src/lib.rs

pub mod error;
pub mod spans;

use std::sync::Arc;
use std::time::{Duration, Instant};

use analytics::{
    aggregate_batch, aggregate_performance, summarize, AggregatePerformanceReport, BatchReport,
    ResultReport, SummaryReport,
};
use app_config::{deep_merge, set_path, BatchOptions};
use core_types::DateSpan;
use execution::{run_partitions, ComputeEngine, PartitionRequest};
use serde::{Serialize, Serializer};
use serde_json::Value;

pub use error::{Error, Result};
pub use spans::generate_spans;

/// Exporter switches that carry the heavy per-candle and per-trade payloads.
const BIG_DATA_FLAGS: [&str; 3] = ["roundtrips", "stratCandles", "stratUpdates"];

/// The partition requests a batch would dispatch, with the options they were
/// derived from.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub options: BatchOptions,
    pub requests: Vec<PartitionRequest>,
}

/// The combined result of one batch run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub spans: Vec<DateSpan>,
    /// Per-partition reports, in chronological order.
    pub backtests: Vec<ResultReport>,
    /// `None` when the range produced no partitions.
    pub performance_report: Option<AggregatePerformanceReport>,
    pub batch_report: Option<BatchReport>,
    pub summary_report: SummaryReport,
    /// Wall-clock time of the whole batch, for observability only.
    #[serde(rename = "elapsedMs", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

/// Splits one simulation configuration into calendar partitions, runs them on
/// a compute engine and aggregates the results.
pub struct BatchBacktester {
    /// The engine every partition is executed on.
    pub engine: Arc<dyn ComputeEngine>,
    /// Configuration every batch starts from. Never modified.
    base_config: Value,
}

impl BatchBacktester {
    pub fn new(engine: Arc<dyn ComputeEngine>, base_config: Value) -> Self {
        Self { engine, base_config }
    }

    pub fn base_config(&self) -> &Value {
        &self.base_config
    }

    /// Builds the partition requests for `overrides` without running them.
    pub fn plan(&self, overrides: &Value) -> Result<BatchPlan> {
        // --- 1. Merge and resolve options ---
        let config = deep_merge(&self.base_config, overrides);
        let options = BatchOptions::from_config(&config)?;

        // --- 2. Spans ---
        let spans = generate_spans(options.range_from, options.range_to, options.batch_size, options.warmup);

        // --- 3. One owned request per span ---
        let template = partition_template(config, &options);
        let requests = spans
            .into_iter()
            .enumerate()
            .map(|(index, span)| PartitionRequest::new(index, &template, span))
            .collect();

        Ok(BatchPlan { options, requests })
    }

    /// Runs a full batch for `overrides` and returns every report together
    /// with the aggregates.
    ///
    /// Any partition failure aborts the batch; no partial aggregate is produced.
    pub async fn run_batch(&self, overrides: &Value) -> Result<BatchOutcome> {
        let start_time = Instant::now();
        let BatchPlan { options, requests } = self.plan(overrides)?;
        let spans: Vec<DateSpan> = requests.iter().map(|request| request.span).collect();

        tracing::info!(
            partitions = spans.len(),
            batch_size = %options.batch_size,
            warmup_minutes = options.warmup.num_minutes(),
            synchronous = options.synchronous,
            "Starting batch backtest."
        );

        let backtests = run_partitions(Arc::clone(&self.engine), &options.mode, requests, options.synchronous)
            .await
            .map_err(|source| Error::PartitionExecution {
                index: source.index,
                elapsed: start_time.elapsed(),
                source,
            })?;

        // --- Aggregation ---
        let performance_report = aggregate_performance(&backtests, options.profit_threshold)?;
        let batch_report = aggregate_batch(&backtests)?;
        let summary_report = summarize(backtests.iter().map(|report| report.stats.as_ref()));

        let elapsed = start_time.elapsed();
        tracing::info!(
            duration = ?elapsed,
            partitions = spans.len(),
            total_trades = summary_report.total_trades,
            "Batch backtest finished."
        );

        Ok(BatchOutcome {
            spans,
            backtests,
            performance_report,
            batch_report,
            summary_report,
            elapsed,
        })
    }
}

/// The configuration every partition request is cloned from.
fn partition_template(mut config: Value, options: &BatchOptions) -> Value {
    if options.no_big_data {
        for flag in BIG_DATA_FLAGS {
            set_path(&mut config, &["backtestResultExporter", "data", flag], Value::Bool(false));
        }
    }
    config
}
