//! Market data providers

pub mod alpha_vantage;

pub use alpha_vantage::{AlphaVantageClient, parse_series_response};

use async_trait::async_trait;

use crate::error::Result;
use crate::params::SeriesRequest;
use crate::series::TimeSeries;

/// Source of OHLCV time series
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataFetcher: Send + Sync {
    /// Fetch one series; one logical request per call
    async fn fetch_series(&self, request: &SeriesRequest) -> Result<TimeSeries>;
}
