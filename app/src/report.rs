// In app/src/report.rs

use backtester::{BatchOutcome, BatchPlan};

/// Helper function to print the batch outcome in a readable format.
pub fn print_batch_report(outcome: &BatchOutcome) {
    println!("\n--- Batch Backtest Report ---");
    println!("-----------------------------------");
    println!("Partitions:            {}", outcome.spans.len());
    println!("Elapsed:               {:.1}s", outcome.elapsed.as_secs_f64());
    println!("-----------------------------------");

    match &outcome.performance_report {
        Some(report) => {
            println!("Total Profit:          {:.2}", report.profit);
            println!("Relative Profit:       {:.2}%", report.relative_profit);
            println!("Yearly Profit:         {:.2}", report.yearly_profit);
            println!("Trades / Losses:       {} / {}", report.trades, report.losses);
            println!("Start Balance:         {:.2}", report.start_balance);
            println!("Start / End Price:     {:.2} -> {:.2}", report.start_price, report.end_price);
            println!("-----------------------------------");
            println!("Min / Max Profit:      {:.2} / {:.2}", report.min_profit, report.max_profit);
            println!(
                "Winning Periods:       {} of {} ({} losing)",
                report.periods_profit, report.periods_total, report.periods_loss
            );
        }
        None => println!("No partitions were run for the configured date range."),
    }
    println!("-----------------------------------");

    let summary = &outcome.summary_report;
    println!("Summary Trades:        {}", summary.total_trades);
    println!("Summary Profit:        {:.2}", summary.total_profit);
    println!("-----------------------------------");

    if !outcome.spans.is_empty() {
        println!("Per-Partition Profit:");
        for (span, report) in outcome.spans.iter().zip(&outcome.backtests) {
            let profit = report
                .performance_report
                .as_ref()
                .map(|perf| perf.profit)
                .unwrap_or_default();
            println!("  - {}: {:.2}", span, profit);
        }
        println!("-----------------------------------");
    }
}

/// Prints the partitions a batch would dispatch.
pub fn print_plan(plan: &BatchPlan) {
    let options = &plan.options;
    println!("\n--- Batch Plan ---");
    println!("Batch Size:            {}", options.batch_size);
    println!("Warm-up:               {} minutes", options.warmup.num_minutes());
    println!("Execution:             {}", if options.synchronous { "sequential" } else { "concurrent" });
    println!("Partitions:            {}", plan.requests.len());
    for request in &plan.requests {
        println!("  [{:>3}] {}", request.index, request.span);
    }
}
