//! Error types for stock data operations

use av_mcp::MCPError;
use thiserror::Error;

/// Stock data specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Missing or invalid configuration; fatal at startup
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Alpha Vantage reported an error in an otherwise successful response
    #[error("Alpha Vantage error: {0}")]
    Upstream(String),

    /// Non-2xx HTTP status
    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },

    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The expected series key is absent from the response
    #[error("No time series data found in response (missing '{key}')")]
    DataShape { key: String },

    /// The series has no data points
    #[error("No data points available for {symbol}")]
    EmptySeries { symbol: String },

    /// A value in the series is not a usable number
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Invalid tool or resource input
    #[error("Invalid input: {0}")]
    Validation(String),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

/// Resource reads surface stock errors to the transport
impl From<StockError> for MCPError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::Validation(_) => MCPError::InvalidParams(err.to_string()),
            other => MCPError::ResourceReadFailed(other.to_string()),
        }
    }
}
