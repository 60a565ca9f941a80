//! Plain-text rendering of time series

use crate::error::{Result, StockError};
use crate::params::Interval;
use crate::series::TimeSeries;

/// Records shown per report
pub const DEFAULT_MAX_POINTS: usize = 10;

/// Renders the most recent bars of a series as a bounded text report
#[derive(Debug, Clone, Copy)]
pub struct TimeSeriesFormatter {
    max_points: usize,
}

impl Default for TimeSeriesFormatter {
    fn default() -> Self {
        Self {
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

impl TimeSeriesFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show at most `max_points` records (at least one)
    pub fn with_max_points(max_points: usize) -> Self {
        Self {
            max_points: max_points.max(1),
        }
    }

    /// Format `series` most recent first
    ///
    /// Values are printed exactly as the provider sent them. When the series
    /// holds more than `max_points` records a trailing line counts the rest.
    pub fn format(&self, series: &TimeSeries, symbol: &str, interval: Interval) -> Result<String> {
        if series.is_empty() {
            return Err(StockError::EmptySeries {
                symbol: symbol.to_uppercase(),
            });
        }

        let mut output = format!(
            "Stock data for {} ({}):\n\n",
            symbol.to_uppercase(),
            interval.label()
        );

        for (key, bar) in series.latest_first().take(self.max_points) {
            output.push_str(&format!("{key}:\n"));
            output.push_str(&format!("  Open: {}\n", bar.open));
            output.push_str(&format!("  High: {}\n", bar.high));
            output.push_str(&format!("  Low: {}\n", bar.low));
            output.push_str(&format!("  Close: {}\n", bar.close));
            output.push_str(&format!("  Volume: {}\n", bar.volume));
            output.push('\n');
        }

        if series.len() > self.max_points {
            output.push_str(&format!(
                "...and {} more data points",
                series.len() - self.max_points
            ));
        }

        Ok(output.trim_end().to_string())
    }
}
