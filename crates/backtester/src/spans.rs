// In crates/backtester/src/spans.rs

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use core_types::{BatchSize, DateSpan};

/// The first day of the calendar period (month, quarter or year) containing `date`.
fn period_floor(date: NaiveDate, batch_size: BatchSize) -> Option<NaiveDate> {
    let month = match batch_size {
        BatchSize::Month => date.month(),
        BatchSize::Quarter => (date.month0() / 3) * 3 + 1,
        BatchSize::Year => 1,
    };
    NaiveDate::from_ymd_opt(date.year(), month, 1)
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Cuts `[from, to)` into calendar-aligned partitions of `batch_size`.
///
/// The first partition starts on the first period boundary at or after
/// `from`; a trailing partition that would end after `to` is dropped. Every
/// span's `from` is pulled back by `warmup` so the engine has history to
/// work with before the scored window opens.
pub fn generate_spans(
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    batch_size: BatchSize,
    warmup: Duration,
) -> Vec<DateSpan> {
    let mut spans = Vec::new();
    let Some(floor) = period_floor(from.date_naive(), batch_size) else {
        return spans;
    };

    let mut start = floor;
    if midnight(start) < from {
        match start.checked_add_months(batch_size.step()) {
            Some(next) => start = next,
            None => return spans,
        }
    }

    while let Some(end) = start.checked_add_months(batch_size.step()) {
        if midnight(end) > to {
            break;
        }
        let Some(warm_start) = midnight(start).checked_sub_signed(warmup) else {
            break;
        };
        // `end > start` and `warmup >= 0`, so the span is never empty.
        if let Ok(span) = DateSpan::new(warm_start, midnight(end)) {
            spans.push(span);
        }
        start = end;
    }

    tracing::debug!(count = spans.len(), %batch_size, "Generated batch spans.");
    spans
}
