//! Threshold-based price movement alerts
//!
//! Compares each of the last (up to) ten daily closes with the close before
//! it and reports every move whose magnitude reaches the threshold.

use std::fmt;
use tracing::warn;

use crate::error::{Result, StockError};
use crate::params::validate_threshold;
use crate::series::TimeSeries;

/// Day-over-day comparisons per analysis
pub const LOOKBACK_DAYS: usize = 10;

/// Direction of a price move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Increased,
    Decreased,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Increased => f.write_str("increased"),
            Direction::Decreased => f.write_str("decreased"),
        }
    }
}

/// A close-to-close move at or above the threshold
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    pub date: String,
    pub direction: Direction,
    /// Magnitude of the move in percent, never negative
    pub percent_change: f64,
    pub from_close: f64,
    pub to_close: f64,
}

impl fmt::Display for AlertEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Price {} by {:.2}% (from ${} to ${})",
            self.date, self.direction, self.percent_change, self.from_close, self.to_close
        )
    }
}

/// Outcome of an alert analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AlertReport {
    /// Fewer than two daily records
    InsufficientHistory { symbol: String },
    Analyzed {
        symbol: String,
        threshold: f64,
        days_analyzed: usize,
        alerts: Vec<AlertEvent>,
    },
}

impl AlertReport {
    /// Alerts found, most recent first
    pub fn alerts(&self) -> &[AlertEvent] {
        match self {
            AlertReport::InsufficientHistory { .. } => &[],
            AlertReport::Analyzed { alerts, .. } => alerts,
        }
    }

    pub fn render(&self) -> String {
        match self {
            AlertReport::InsufficientHistory { symbol } => format!(
                "Not enough historical data to analyze price movements for {symbol}."
            ),
            AlertReport::Analyzed {
                symbol,
                threshold,
                days_analyzed,
                alerts,
            } if alerts.is_empty() => format!(
                "No significant price movements (>= {threshold}%) detected for {symbol} \
                 in the last {days_analyzed} trading days."
            ),
            AlertReport::Analyzed {
                symbol,
                threshold,
                alerts,
                ..
            } => {
                let mut output =
                    format!("Price alerts for {symbol} (threshold: {threshold}%):\n\n");
                let lines: Vec<String> = alerts.iter().map(ToString::to_string).collect();
                output.push_str(&lines.join("\n"));
                output
            }
        }
    }
}

/// Detects significant day-over-day moves in a daily series
#[derive(Debug, Clone, Copy)]
pub struct AlertAnalyzer {
    threshold: f64,
}

impl AlertAnalyzer {
    /// Create an analyzer; `threshold` is a percentage and must be positive
    pub fn new(threshold: f64) -> Result<Self> {
        Ok(Self {
            threshold: validate_threshold(threshold)?,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn analyze(&self, series: &TimeSeries, symbol: &str) -> Result<AlertReport> {
        let symbol = symbol.to_uppercase();

        if series.len() < 2 {
            return Ok(AlertReport::InsufficientHistory { symbol });
        }

        let closes = series
            .latest_first()
            .take(LOOKBACK_DAYS + 1)
            .map(|(date, bar)| {
                bar.close_value().map(|close| (date, close)).ok_or_else(|| {
                    StockError::InvalidData(format!("close price '{}' on {date}", bar.close))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut alerts = Vec::new();
        for pair in closes.windows(2) {
            let (date, current) = pair[0];
            let (prev_date, previous) = pair[1];

            if previous.abs() < f64::EPSILON {
                warn!(
                    "Skipping {} for {}: previous close on {} is zero",
                    date, symbol, prev_date
                );
                continue;
            }

            let change = (current - previous) / previous * 100.0;
            if change.abs() >= self.threshold {
                alerts.push(AlertEvent {
                    date: date.to_string(),
                    direction: if change >= 0.0 {
                        Direction::Increased
                    } else {
                        Direction::Decreased
                    },
                    percent_change: change.abs(),
                    from_close: previous,
                    to_close: current,
                });
            }
        }

        Ok(AlertReport::Analyzed {
            symbol,
            threshold: self.threshold,
            days_analyzed: closes.len() - 1,
            alerts,
        })
    }
}
