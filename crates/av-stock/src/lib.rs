//! Alpha Vantage stock data for MCP agents
//!
//! This crate provides:
//!
//! - The time series model and the Alpha Vantage client ([`AlphaVantageClient`])
//! - [`TimeSeriesFormatter`]: bounded text reports of the latest bars
//! - [`AlertAnalyzer`]: threshold-based day-over-day move detection
//! - [`StockDispatcher`]: input validation, fetching and rendering
//! - The `get-stock-data`, `get-daily-stock-data` and `get-stock-alerts`
//!   tools and the `stock://{symbol}/{interval}` resource template
//!
//! # Example
//!
//! ```rust,no_run
//! use av_stock::{AlphaVantageClient, StockConfig, build_server};
//! use av_utils::LogContext;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let log = LogContext::new("alphavantage-mcp");
//! let config = StockConfig::from_env()?;
//! let client = AlphaVantageClient::new(&config, log.with_context("fetcher"))?;
//!
//! let server = build_server(Arc::new(client), &log)?;
//! server.run_stdio().await?;
//! # Ok(())
//! # }
//! ```

pub mod alerts;
pub mod api;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod formatter;
pub mod params;
pub mod resources;
pub mod retry;
pub mod series;
pub mod server;
pub mod tools;

pub use alerts::{AlertAnalyzer, AlertEvent, AlertReport, Direction};
pub use api::{AlphaVantageClient, MarketDataFetcher};
pub use config::StockConfig;
pub use dispatcher::StockDispatcher;
pub use error::{Result, StockError};
pub use formatter::TimeSeriesFormatter;
pub use params::{Interval, OutputSize, QueryParams, SeriesRequest};
pub use resources::StockResource;
pub use retry::RetryPolicy;
pub use series::{OhlcvRecord, TimeSeries};
pub use server::{SERVER_NAME, build_server};
pub use tools::{DailyStockDataTool, StockAlertsTool, StockDataTool};
