//! Query parameters and input normalization
//!
//! Hosts may deliver any scalar argument wrapped in a list (URI template
//! variables in particular). Arguments are unwrapped to their first element
//! here, on entry, and never reach the core logic in that shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StockError};

/// Default alert threshold in percent
pub const DEFAULT_THRESHOLD: f64 = 5.0;

/// Sampling interval of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1min")]
    OneMin,
    #[serde(rename = "5min")]
    FiveMin,
    #[serde(rename = "15min")]
    FifteenMin,
    #[serde(rename = "30min")]
    ThirtyMin,
    #[serde(rename = "60min")]
    SixtyMin,
    #[serde(rename = "daily")]
    Daily,
}

impl Interval {
    pub const ALL: [Interval; 6] = [
        Interval::OneMin,
        Interval::FiveMin,
        Interval::FifteenMin,
        Interval::ThirtyMin,
        Interval::SixtyMin,
        Interval::Daily,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Interval::OneMin => "1min",
            Interval::FiveMin => "5min",
            Interval::FifteenMin => "15min",
            Interval::ThirtyMin => "30min",
            Interval::SixtyMin => "60min",
            Interval::Daily => "daily",
        }
    }

    pub fn is_intraday(self) -> bool {
        self != Interval::Daily
    }

    /// Label used in report headers
    pub fn label(self) -> &'static str {
        match self {
            Interval::Daily => "Daily",
            other => other.as_str(),
        }
    }

    /// Alpha Vantage `function` query parameter
    pub fn function(self) -> &'static str {
        if self.is_intraday() {
            "TIME_SERIES_INTRADAY"
        } else {
            "TIME_SERIES_DAILY"
        }
    }

    /// Key of the series object in the response
    pub fn series_key(self) -> String {
        match self {
            Interval::Daily => "Time Series (Daily)".to_string(),
            other => format!("Time Series ({})", other.as_str()),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        Interval::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| {
                StockError::Validation(format!(
                    "interval must be one of 1min, 5min, 15min, 30min, 60min, daily (got '{s}')"
                ))
            })
    }
}

/// Amount of history requested from the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSize {
    /// Latest ~100 points
    #[default]
    Compact,
    /// Full history
    Full,
}

impl OutputSize {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

impl fmt::Display for OutputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputSize {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "compact" => Ok(OutputSize::Compact),
            "full" => Ok(OutputSize::Full),
            other => Err(StockError::Validation(format!(
                "outputsize must be 'compact' or 'full' (got '{other}')"
            ))),
        }
    }
}

/// What to fetch from the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub symbol: String,
    pub interval: Interval,
    pub output_size: OutputSize,
}

/// Validated inputs of one tool or resource invocation
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    /// Symbol as given by the caller
    pub symbol: String,
    pub interval: Interval,
    pub output_size: OutputSize,
    /// Raw alert threshold; only the alerts path reads it, see [`QueryParams::threshold`]
    pub threshold: Option<Value>,
}

impl QueryParams {
    /// Parse named values (tool arguments or URI template variables)
    pub fn from_map(map: &Map<String, Value>, default_interval: Interval) -> Result<Self> {
        let symbol = string_arg(map, "symbol")?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| StockError::Validation("symbol is required".to_string()))?;

        let interval = match string_arg(map, "interval")? {
            Some(raw) => raw.parse()?,
            None => default_interval,
        };

        let output_size = match string_arg(map, "outputsize")? {
            Some(raw) => raw.parse()?,
            None => OutputSize::default(),
        };

        let threshold = map.get("threshold").and_then(scalar).cloned();

        Ok(Self {
            symbol,
            interval,
            output_size,
            threshold,
        })
    }

    /// Alert threshold in percent, [`DEFAULT_THRESHOLD`] when absent
    ///
    /// Numeric strings are accepted; the value must be finite and positive.
    pub fn threshold(&self) -> Result<f64> {
        let threshold = match &self.threshold {
            None => DEFAULT_THRESHOLD,
            Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
            Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
                StockError::Validation(format!("threshold must be a number (got '{s}')"))
            })?,
            Some(other) => {
                return Err(StockError::Validation(format!(
                    "threshold must be a number (got {other})"
                )));
            }
        };

        validate_threshold(threshold)
    }

    /// Symbol for display
    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }

    pub fn series_request(&self) -> SeriesRequest {
        SeriesRequest {
            symbol: self.symbol.clone(),
            interval: self.interval,
            output_size: self.output_size,
        }
    }
}

/// First element of a list, the value itself otherwise; `None` for null
fn scalar(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.first().and_then(scalar),
        Value::Null => None,
        other => Some(other),
    }
}

fn string_arg(map: &Map<String, Value>, name: &str) -> Result<Option<String>> {
    match map.get(name).and_then(scalar) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(StockError::Validation(format!(
            "{name} must be a string (got {other})"
        ))),
    }
}

/// Thresholds must be finite and strictly positive
pub fn validate_threshold(threshold: f64) -> Result<f64> {
    if threshold.is_finite() && threshold > 0.0 {
        Ok(threshold)
    } else {
        Err(StockError::Validation(format!(
            "threshold must be a positive number (got {threshold})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(args: Value, default_interval: Interval) -> Result<QueryParams> {
        let map = args.as_object().cloned().unwrap_or_default();
        QueryParams::from_map(&map, default_interval)
    }

    #[test]
    fn test_interval_round_trip_names() {
        for interval in Interval::ALL {
            assert_eq!(interval.as_str().parse::<Interval>().unwrap(), interval);
        }
        assert!("2min".parse::<Interval>().is_err());
        assert!("Daily".parse::<Interval>().is_err());
    }

    #[test]
    fn test_interval_endpoint_shapes() {
        assert_eq!(Interval::Daily.function(), "TIME_SERIES_DAILY");
        assert_eq!(Interval::Daily.series_key(), "Time Series (Daily)");
        assert_eq!(Interval::Daily.label(), "Daily");

        assert_eq!(Interval::FifteenMin.function(), "TIME_SERIES_INTRADAY");
        assert_eq!(Interval::FifteenMin.series_key(), "Time Series (15min)");
        assert_eq!(Interval::FifteenMin.label(), "15min");
    }

    #[test]
    fn test_defaults() {
        let params = parse(json!({"symbol": "aapl"}), Interval::FiveMin).unwrap();

        assert_eq!(params.symbol, "aapl");
        assert_eq!(params.display_symbol(), "AAPL");
        assert_eq!(params.interval, Interval::FiveMin);
        assert_eq!(params.output_size, OutputSize::Compact);
        assert!(params.threshold.is_none());
        assert!((params.threshold().unwrap() - DEFAULT_THRESHOLD).abs() < f64::EPSILON);
    }

    #[test]
    fn test_explicit_values() {
        let params = parse(
            json!({"symbol": "MSFT", "interval": "60min", "outputsize": "full", "threshold": 2.5}),
            Interval::Daily,
        )
        .unwrap();

        assert_eq!(params.interval, Interval::SixtyMin);
        assert_eq!(params.output_size, OutputSize::Full);
        assert!((params.threshold().unwrap() - 2.5).abs() < f64::EPSILON);

        let request = params.series_request();
        assert_eq!(request.symbol, "MSFT");
        assert_eq!(request.interval, Interval::SixtyMin);
    }

    #[test]
    fn test_list_wrapped_scalars_take_first_element() {
        let params = parse(
            json!({"symbol": ["IBM", "MSFT"], "interval": ["daily"], "threshold": ["3"]}),
            Interval::FiveMin,
        )
        .unwrap();

        assert_eq!(params.symbol, "IBM");
        assert_eq!(params.interval, Interval::Daily);
        assert_eq!(params.threshold, Some(json!("3")));
        assert!((params.threshold().unwrap() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_symbol_required() {
        for args in [
            json!({}),
            json!({"symbol": ""}),
            json!({"symbol": "   "}),
            json!({"symbol": []}),
            json!({"symbol": null}),
        ] {
            let err = parse(args.clone(), Interval::Daily).unwrap_err();
            assert!(matches!(err, StockError::Validation(_)), "args: {args}");
        }
    }

    #[test]
    fn test_invalid_values() {
        assert!(parse(json!({"symbol": "A", "interval": "2min"}), Interval::Daily).is_err());
        assert!(parse(json!({"symbol": "A", "outputsize": "huge"}), Interval::Daily).is_err());
        assert!(parse(json!({"symbol": {"x": 1}}), Interval::Daily).is_err());
    }

    #[test]
    fn test_threshold_is_checked_only_when_read() {
        for threshold in [json!(0), json!(-1.5), json!("abc"), json!(true)] {
            let params = parse(json!({"symbol": "A", "threshold": threshold}), Interval::Daily)
                .expect("parsing ignores the threshold");
            assert!(params.threshold().is_err(), "threshold: {threshold}");
        }

        assert!(validate_threshold(f64::INFINITY).is_err());
        assert!(validate_threshold(0.01).is_ok());
    }
}
