//! Shared utilities for alphavantage-mcp
//!
//! Logging setup and the [`LogContext`] handed to every component at
//! construction time.

pub mod logging;

pub use logging::{LogContext, LogFormat, init_tracing};
