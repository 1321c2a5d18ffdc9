// In crates/core-types/src/types.rs

use std::fmt;

use chrono::{DateTime, Months, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A half-open `[from, to)` window handed to the compute engine.
///
/// `from` already includes the warm-up lead time, `to` is the exclusive end
/// of the scored window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateSpan {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateSpan {
    /// Creates a span, rejecting empty or inverted ranges.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self> {
        if from >= to {
            return Err(Error::InvalidSpan { from, to });
        }
        Ok(Self { from, to })
    }

    /// The span's start as sent to the engine (RFC 3339, second precision).
    pub fn from_rfc3339(&self) -> String {
        self.from.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// The span's end as sent to the engine (RFC 3339, second precision).
    pub fn to_rfc3339(&self) -> String {
        self.to.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from_rfc3339(), self.to_rfc3339())
    }
}

/// The calendar granularity a batch range is cut into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BatchSize {
    #[default]
    #[serde(rename = "1 month")]
    Month,
    #[serde(rename = "1 quarter")]
    Quarter,
    #[serde(rename = "1 year")]
    Year,
}

impl BatchSize {
    /// Resolves the configured `batchSize` string.
    ///
    /// Absent or unrecognised values fall back to the monthly scheme.
    pub fn from_setting(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("1 month") | None => BatchSize::Month,
            Some("1 quarter") => BatchSize::Quarter,
            Some("1 year") => BatchSize::Year,
            Some(other) => {
                tracing::warn!(batch_size = other, "Unrecognised batch size, falling back to '1 month'.");
                BatchSize::Month
            }
        }
    }

    /// The number of calendar months in one partition.
    pub fn months(self) -> u32 {
        match self {
            BatchSize::Month => 1,
            BatchSize::Quarter => 3,
            BatchSize::Year => 12,
        }
    }

    pub fn step(self) -> Months {
        Months::new(self.months())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BatchSize::Month => "1 month",
            BatchSize::Quarter => "1 quarter",
            BatchSize::Year => "1 year",
        }
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The engine mode a sub-run is executed in (e.g. "backtest").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunMode(pub String);

impl Default for RunMode {
    fn default() -> Self {
        RunMode("backtest".to_string())
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_span_rejects_inverted_range() {
        let from = Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert!(DateSpan::new(from, to).is_err());
        assert!(DateSpan::new(from, from).is_err());
        assert!(DateSpan::new(to, from).is_ok());
    }

    #[test]
    fn test_date_span_formats_as_utc_seconds() {
        let span = DateSpan::new(
            Utc.with_ymd_and_hms(2019, 12, 31, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap(),
        )
        .unwrap();
        assert_eq!(span.from_rfc3339(), "2019-12-31T12:00:00Z");
        assert_eq!(span.to_rfc3339(), "2020-02-01T00:00:00Z");
    }

    #[test]
    fn test_batch_size_fallback() {
        assert_eq!(BatchSize::from_setting(Some("1 quarter")), BatchSize::Quarter);
        assert_eq!(BatchSize::from_setting(Some("1 year")), BatchSize::Year);
        assert_eq!(BatchSize::from_setting(Some("2 weeks")), BatchSize::Month);
        assert_eq!(BatchSize::from_setting(None), BatchSize::Month);
        assert_eq!(BatchSize::Quarter.months(), 3);
    }
}
