// In crates/analytics/src/types.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Reads an explicit `null` the same as an absent key.
///
/// JavaScript engines serialise `NaN` and `Infinity` as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The engine's financial summary for one sub-run.
///
/// Every field is optional on the wire; anything missing or `null` reads as
/// zero (or `None` for the timestamps). Timestamps are passed through as the
/// engine sent them, string or epoch number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceReport {
    #[serde(deserialize_with = "null_as_default")]
    pub losses: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub profit: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub relative_profit: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub trades: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub yearly_profit: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub start_balance: Decimal,
    #[serde(deserialize_with = "null_as_default")]
    pub start_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub end_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Value>,
}

/// The slimmed-down per-partition stats some engines return in place of (or
/// alongside) the full report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionStats {
    /// Profit of each closed trade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profits: Option<Vec<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_tot: Option<Decimal>,
}

/// Everything the compute engine returns for one partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_report: Option<PerformanceReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roundtrips: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strat_candles: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trades: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<PartitionStats>,
    /// Engine-specific fields we do not interpret, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResultReport {
    pub fn with_performance(report: PerformanceReport) -> Self {
        Self {
            performance_report: Some(report),
            ..Self::default()
        }
    }
}

/// The performance of a whole batch, summed over its partitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatePerformanceReport {
    // Summed over all partitions
    pub losses: u64,
    pub profit: Decimal,
    pub relative_profit: f64,
    pub trades: u64,
    pub yearly_profit: Decimal,

    // Taken from the first partition
    pub start_balance: Decimal,
    pub start_price: Decimal,
    pub start_time: Option<Value>,

    // Taken from the last partition
    pub end_price: Decimal,
    pub end_time: Option<Value>,

    // Extremes and period counters
    pub min_profit: Decimal,
    pub max_profit: Decimal,
    pub periods_profit: usize,
    pub periods_loss: usize,
    pub periods_total: usize,
}

/// Profit extremes across partitions, independent of any threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub min_profit: Decimal,
    pub max_profit: Decimal,
}

/// Totals computed from [`PartitionStats`] alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub total_trades: usize,
    pub total_profit: Decimal,
    pub periods_total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_missing_numeric_fields_read_as_zero() {
        let report: ResultReport = serde_json::from_value(json!({
            "performanceReport": { "profit": 12.5, "trades": 4 }
        }))
        .unwrap();

        let perf = report.performance_report.unwrap();
        assert_eq!(perf.profit, dec!(12.5));
        assert_eq!(perf.trades, 4);
        assert_eq!(perf.losses, 0);
        assert_eq!(perf.yearly_profit, Decimal::ZERO);
        assert_eq!(perf.start_time, None);
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let report: ResultReport = serde_json::from_value(json!({
            "performanceReport": {},
            "stratUpdates": [1, 2, 3],
            "stats": { "profits": [1.0, -2.0], "profitTot": -1.0 }
        }))
        .unwrap();

        assert_eq!(report.extra.get("stratUpdates"), Some(&json!([1, 2, 3])));
        let stats = report.stats.unwrap();
        assert_eq!(stats.profits.map(|p| p.len()), Some(2));
        assert_eq!(stats.profit_tot, Some(dec!(-1)));
    }

    #[test]
    fn test_numeric_timestamps_pass_through() {
        let report: ResultReport = serde_json::from_value(json!({
            "performanceReport": { "profit": 1.0, "startTime": 1514764800000u64, "endTime": "2018-02-01 00:00:00" }
        }))
        .unwrap();

        let perf = report.performance_report.unwrap();
        assert_eq!(perf.start_time, Some(json!(1514764800000u64)));
        assert_eq!(perf.end_time, Some(json!("2018-02-01 00:00:00")));
    }

    #[test]
    fn test_null_numeric_fields_read_as_zero() {
        let report: ResultReport = serde_json::from_value(json!({
            "performanceReport": {
                "profit": 1.0,
                "relativeProfit": null,
                "yearlyProfit": null,
                "trades": null,
                "startTime": null
            }
        }))
        .unwrap();

        let perf = report.performance_report.unwrap();
        assert_eq!(perf.profit, dec!(1));
        assert_eq!(perf.relative_profit, 0.0);
        assert_eq!(perf.yearly_profit, Decimal::ZERO);
        assert_eq!(perf.trades, 0);
        assert_eq!(perf.start_time, None);
    }

    #[test]
    fn test_report_without_performance_section_still_decodes() {
        let report: ResultReport = serde_json::from_value(json!({ "roundtrips": [] })).unwrap();
        assert!(report.performance_report.is_none());
        assert_eq!(report.roundtrips, Some(vec![]));
    }
}
