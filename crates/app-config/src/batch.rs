// In crates/app-config/src/batch.rs

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use core_types::{BatchSize, RunMode};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{Error, Result};

// --- Typed view over the parts of the simulation configuration we read ---

/// A section overridden with `null` reads the same as an absent one.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigView {
    #[serde(default)]
    mode: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    batch: BatchSection,
    #[serde(default, deserialize_with = "null_as_default")]
    batch_backtest: BatchBacktestSection,
    #[serde(default, deserialize_with = "null_as_default")]
    trading_advisor: AdvisorSection,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct BatchSection {
    #[serde(default, deserialize_with = "null_as_default")]
    synchronous: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    no_big_data: bool,
    #[serde(default)]
    batch_period_profit_threshold: Option<Decimal>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct BatchBacktestSection {
    /// Any shape is accepted here; anything but a known string falls back to monthly.
    #[serde(default)]
    batch_size: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    daterange: DateRangeSection,
}

#[derive(Deserialize, Debug, Default)]
struct DateRangeSection {
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct AdvisorSection {
    #[serde(default)]
    history_size: Option<u64>,
    #[serde(default)]
    candle_size: Option<u64>,
}

/// Everything the batch orchestrator needs, resolved from a merged configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    /// The engine mode every sub-run is executed in.
    pub mode: RunMode,
    /// Run partitions one after another instead of all at once.
    pub synchronous: bool,
    /// Suppress roundtrips and per-candle strategy output in sub-run reports.
    pub no_big_data: bool,
    /// A period counts as profitable when its profit is at least this value.
    pub profit_threshold: Decimal,
    pub batch_size: BatchSize,
    pub history_size: u64,
    /// Candle size in minutes.
    pub candle_size: u64,
    /// Start of the overall batch range (inclusive).
    pub range_from: DateTime<Utc>,
    /// End of the overall batch range (exclusive).
    pub range_to: DateTime<Utc>,
    /// historySize x candleSize minutes.
    pub warmup: Duration,
}

impl BatchOptions {
    /// Resolves batch options from a merged simulation configuration.
    ///
    /// Fails when the advisor history/candle size or the batch date range are
    /// missing, since no partition can be planned without them, and when the
    /// warm-up reaches back past the earliest representable date.
    pub fn from_config(config: &Value) -> Result<Self> {
        let view = ConfigView::deserialize(config)?;

        let history_size = view
            .trading_advisor
            .history_size
            .ok_or(Error::MissingField { field: "tradingAdvisor.historySize" })?;
        let candle_size = view
            .trading_advisor
            .candle_size
            .ok_or(Error::MissingField { field: "tradingAdvisor.candleSize" })?;
        let warmup = warmup_duration(history_size, candle_size)?;

        let from = view
            .batch_backtest
            .daterange
            .from
            .ok_or(Error::MissingField { field: "batchBacktest.daterange.from" })?;
        let to = view
            .batch_backtest
            .daterange
            .to
            .ok_or(Error::MissingField { field: "batchBacktest.daterange.to" })?;
        let range_from = parse_date(&from, "batchBacktest.daterange.from")?;
        let range_to = parse_date(&to, "batchBacktest.daterange.to")?;

        if range_from.checked_sub_signed(warmup).is_none() {
            return Err(Error::InvalidField {
                field: "tradingAdvisor.historySize",
                reason: format!("warm-up of {} minutes reaches before the earliest supported date", warmup.num_minutes()),
            });
        }

        Ok(Self {
            mode: view.mode.map(RunMode).unwrap_or_default(),
            synchronous: view.batch.synchronous,
            no_big_data: view.batch.no_big_data,
            profit_threshold: view.batch.batch_period_profit_threshold.unwrap_or(Decimal::ZERO),
            batch_size: batch_size(view.batch_backtest.batch_size.as_ref()),
            history_size,
            candle_size,
            range_from,
            range_to,
            warmup,
        })
    }
}

fn batch_size(value: Option<&Value>) -> BatchSize {
    match value {
        None | Some(Value::Null) => BatchSize::from_setting(None),
        Some(Value::String(setting)) => BatchSize::from_setting(Some(setting)),
        Some(other) => {
            tracing::warn!(batch_size = %other, "Unrecognised batch size, falling back to '1 month'.");
            BatchSize::Month
        }
    }
}

fn warmup_duration(history_size: u64, candle_size: u64) -> Result<Duration> {
    let invalid = || Error::InvalidField {
        field: "tradingAdvisor.historySize",
        reason: format!("warm-up of {} x {} minutes is out of range", history_size, candle_size),
    };
    let minutes = history_size.checked_mul(candle_size).ok_or_else(invalid)?;
    let minutes = i64::try_from(minutes).map_err(|_| invalid())?;
    Duration::try_minutes(minutes).ok_or_else(invalid)
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) or a bare `YYYY-MM-DD` (midnight UTC).
fn parse_date(s: &str, field: &'static str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        Ok(dt.with_timezone(&Utc))
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        Ok(Utc.from_utc_datetime(&naive))
    } else if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
    } else {
        Err(Error::InvalidField {
            field,
            reason: format!("invalid date format: {}", s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn config() -> Value {
        json!({
            "mode": "backtest",
            "tradingAdvisor": { "historySize": 10, "candleSize": 60 },
            "batch": {
                "synchronous": true,
                "noBigData": true,
                "batchPeriodProfitThreshold": 2.5
            },
            "batchBacktest": {
                "batchSize": "1 quarter",
                "daterange": { "from": "2018-01-01", "to": "2019-01-01T00:00:00Z" }
            }
        })
    }

    #[test]
    fn test_resolves_all_batch_options() {
        let options = BatchOptions::from_config(&config()).unwrap();

        assert_eq!(options.mode, RunMode("backtest".to_string()));
        assert!(options.synchronous);
        assert!(options.no_big_data);
        assert_eq!(options.profit_threshold, dec!(2.5));
        assert_eq!(options.batch_size, BatchSize::Quarter);
        assert_eq!(options.warmup, Duration::minutes(600));
        assert_eq!(options.range_from, Utc.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(options.range_to, Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_defaults_when_batch_section_is_absent() {
        let mut config = config();
        config.as_object_mut().unwrap().remove("batch");
        config.as_object_mut().unwrap().remove("mode");
        config["batchBacktest"].as_object_mut().unwrap().remove("batchSize");

        let options = BatchOptions::from_config(&config).unwrap();

        assert!(!options.synchronous);
        assert!(!options.no_big_data);
        assert_eq!(options.profit_threshold, Decimal::ZERO);
        assert_eq!(options.batch_size, BatchSize::Month);
        assert_eq!(options.mode, RunMode::default());
    }

    #[test]
    fn test_missing_history_size_is_a_configuration_error() {
        let mut config = config();
        config["tradingAdvisor"].as_object_mut().unwrap().remove("historySize");

        let err = BatchOptions::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "tradingAdvisor.historySize" }));
    }

    #[test]
    fn test_missing_date_range_is_a_configuration_error() {
        let mut config = config();
        config["batchBacktest"].as_object_mut().unwrap().remove("daterange");

        let err = BatchOptions::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "batchBacktest.daterange.from" }));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let mut config = config();
        config["batchBacktest"]["daterange"]["to"] = json!("next tuesday");

        let err = BatchOptions::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "batchBacktest.daterange.to", .. }));
    }

    #[test]
    fn test_wrongly_typed_field_is_rejected() {
        let mut config = config();
        config["tradingAdvisor"]["candleSize"] = json!("sixty");

        assert!(matches!(BatchOptions::from_config(&config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_non_string_batch_size_falls_back_to_monthly() {
        let mut config = config();
        config["batchBacktest"]["batchSize"] = json!(3);

        let options = BatchOptions::from_config(&config).unwrap();
        assert_eq!(options.batch_size, BatchSize::Month);
    }

    #[test]
    fn test_null_sections_read_as_defaults() {
        let mut config = config();
        config["batch"] = Value::Null;
        config["batchBacktest"]["batchSize"] = Value::Null;

        let options = BatchOptions::from_config(&config).unwrap();
        assert!(!options.synchronous);
        assert!(!options.no_big_data);
        assert_eq!(options.profit_threshold, Decimal::ZERO);
        assert_eq!(options.batch_size, BatchSize::Month);

        config["tradingAdvisor"] = Value::Null;
        let err = BatchOptions::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "tradingAdvisor.historySize" }));

        let mut config = self::config();
        config["batchBacktest"] = Value::Null;
        let err = BatchOptions::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "batchBacktest.daterange.from" }));
    }

    #[test]
    fn test_warmup_overflow_is_rejected() {
        let mut config = config();
        config["tradingAdvisor"]["historySize"] = json!(u64::MAX);
        config["tradingAdvisor"]["candleSize"] = json!(2);

        let err = BatchOptions::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "tradingAdvisor.historySize", .. }));
    }

    #[test]
    fn test_warmup_past_earliest_date_is_rejected() {
        let mut config = config();
        config["tradingAdvisor"]["historySize"] = json!(10_000_000_000u64);
        config["tradingAdvisor"]["candleSize"] = json!(1000);

        let err = BatchOptions::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "tradingAdvisor.historySize", .. }));
    }

    #[test]
    fn test_gekko_style_timestamp_is_accepted() {
        let date = parse_date("2018-03-01 12:30:00", "x").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2018, 3, 1, 12, 30, 0).unwrap());
    }
}
