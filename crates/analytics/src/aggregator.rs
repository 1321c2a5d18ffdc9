// In crates/analytics/src/aggregator.rs

use rust_decimal::Decimal;

use crate::types::{
    AggregatePerformanceReport, BatchReport, PartitionStats, PerformanceReport, ResultReport,
    SummaryReport,
};
use crate::{Error, Result};

/// Pulls the performance section out of every report, failing on the first
/// report that has none.
fn performance_reports(reports: &[ResultReport]) -> Result<Vec<&PerformanceReport>> {
    reports
        .iter()
        .enumerate()
        .map(|(index, report)| {
            report
                .performance_report
                .as_ref()
                .ok_or(Error::MissingPerformanceReport { index })
        })
        .collect()
}

/// Sums the per-partition performance reports into one batch-wide report.
///
/// `reports` must be in chronological (request) order: the start fields are
/// read from the first report and the end fields from the last. Returns
/// `Ok(None)` when there is nothing to aggregate.
pub fn aggregate_performance(
    reports: &[ResultReport],
    profit_threshold: Decimal,
) -> Result<Option<AggregatePerformanceReport>> {
    let perf = performance_reports(reports)?;
    let (Some(first), Some(last)) = (perf.first(), perf.last()) else {
        return Ok(None);
    };

    // --- 1. Sums, seeded explicitly with zero ---
    let mut aggregate = AggregatePerformanceReport::default();
    for report in &perf {
        aggregate.losses += report.losses;
        aggregate.profit += report.profit;
        aggregate.relative_profit += report.relative_profit;
        aggregate.trades += report.trades;
        aggregate.yearly_profit += report.yearly_profit;
    }

    // --- 2. Boundary fields ---
    aggregate.start_balance = first.start_balance;
    aggregate.start_price = first.start_price;
    aggregate.start_time = first.start_time.clone();
    aggregate.end_price = last.end_price;
    aggregate.end_time = last.end_time.clone();

    // --- 3. Extremes and period counters ---
    aggregate.min_profit = first.profit;
    aggregate.max_profit = first.profit;
    for report in &perf {
        aggregate.min_profit = aggregate.min_profit.min(report.profit);
        aggregate.max_profit = aggregate.max_profit.max(report.profit);
        if report.profit >= profit_threshold {
            aggregate.periods_profit += 1;
        } else {
            aggregate.periods_loss += 1;
        }
    }
    aggregate.periods_total = perf.len();

    tracing::debug!(
        periods = aggregate.periods_total,
        periods_profit = aggregate.periods_profit,
        profit = %aggregate.profit,
        "Aggregated partition performance."
    );

    Ok(Some(aggregate))
}

/// The min/max profit over all partitions. `Ok(None)` when `reports` is empty.
pub fn aggregate_batch(reports: &[ResultReport]) -> Result<Option<BatchReport>> {
    let perf = performance_reports(reports)?;
    let mut profits = perf.iter().map(|report| report.profit);
    let Some(first) = profits.next() else {
        return Ok(None);
    };

    let (min_profit, max_profit) =
        profits.fold((first, first), |(min, max), profit| (min.min(profit), max.max(profit)));

    Ok(Some(BatchReport { min_profit, max_profit }))
}

/// Rolls up trade count and total profit from simplified stats.
///
/// Missing stats (or missing fields inside them) contribute zero.
pub fn summarize<'a, I>(stats: I) -> SummaryReport
where
    I: IntoIterator<Item = Option<&'a PartitionStats>>,
{
    let mut summary = SummaryReport::default();
    for entry in stats {
        summary.periods_total += 1;
        let Some(entry) = entry else { continue };
        summary.total_trades += entry.profits.as_ref().map_or(0, Vec::len);
        summary.total_profit += entry.profit_tot.unwrap_or(Decimal::ZERO);
    }
    summary
}
