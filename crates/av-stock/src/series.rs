//! Time series data model
//!
//! Values are kept exactly as Alpha Vantage sent them so reports can display
//! them unchanged; numeric accessors parse on demand.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One OHLCV bar, with the provider's field names on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OhlcvRecord {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume")]
    pub volume: String,
}

impl OhlcvRecord {
    pub fn new(
        open: impl Into<String>,
        high: impl Into<String>,
        low: impl Into<String>,
        close: impl Into<String>,
        volume: impl Into<String>,
    ) -> Self {
        Self {
            open: open.into(),
            high: high.into(),
            low: low.into(),
            close: close.into(),
            volume: volume.into(),
        }
    }

    /// Closing price, `None` when it is not a finite number
    pub fn close_value(&self) -> Option<f64> {
        self.close
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    pub fn volume_value(&self) -> Option<u64> {
        self.volume.trim().parse().ok()
    }
}

/// Time key to bar mapping
///
/// Keys are stored in lexicographic order. For fixed-width keys
/// (`YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`) that is chronological order; other
/// key formats are not sorted by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeries {
    points: BTreeMap<String, OhlcvRecord>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a bar, returning the one previously stored under `key`
    pub fn insert(&mut self, key: impl Into<String>, record: OhlcvRecord) -> Option<OhlcvRecord> {
        self.points.insert(key.into(), record)
    }

    pub fn get(&self, key: &str) -> Option<&OhlcvRecord> {
        self.points.get(key)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bars in descending key order (most recent first)
    pub fn latest_first(&self) -> impl Iterator<Item = (&str, &OhlcvRecord)> {
        self.points.iter().rev().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, OhlcvRecord)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (String, OhlcvRecord)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
