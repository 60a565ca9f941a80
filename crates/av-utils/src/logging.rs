//! Logging and tracing utilities
//!
//! stdout belongs to the MCP transport, so every subscriber built here writes
//! to stderr.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::Span;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the diagnostic stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line records
    #[default]
    Text,
    /// One JSON object per record
    Json,
}

/// Initialize the global tracing subscriber
///
/// The filter comes from `RUST_LOG` and falls back to `info`.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Named logging context passed into components when they are built
///
/// Contexts are cheap to clone. A child context is derived with
/// [`LogContext::with_context`], producing dotted names such as
/// `alphavantage-mcp.fetcher`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    name: Arc<str>,
}

impl LogContext {
    /// Create a root context
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
        }
    }

    /// Derive a child context for a sub-component
    pub fn with_context(&self, name: &str) -> Self {
        Self {
            name: Arc::from(format!("{}.{name}", self.name)),
        }
    }

    /// Full dotted name of this context
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Span carrying the context name; instrument futures with it
    pub fn span(&self) -> Span {
        tracing::info_span!("component", name = %self.name)
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_nests_names() {
        let root = LogContext::new("server");
        let child = root.with_context("fetcher").with_context("retry");

        assert_eq!(root.name(), "server");
        assert_eq!(child.name(), "server.fetcher.retry");
        assert_eq!(child.to_string(), "server.fetcher.retry");
    }

    #[test]
    fn test_clone_shares_name() {
        let ctx = LogContext::new("a").with_context("b");
        let copy = ctx.clone();
        assert_eq!(ctx, copy);
    }

    #[test]
    fn test_span_without_subscriber() {
        // No subscriber installed: the span is disabled but must still be usable
        let span = LogContext::new("test").span();
        let _guard = span.enter();
    }

    #[test]
    fn test_log_format_serde() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, LogFormat::Json);
        assert_eq!(LogFormat::default(), LogFormat::Text);
    }
}
