//! Alpha Vantage MCP server
//!
//! Speaks MCP over stdin/stdout; diagnostics go to stderr.
//!
//! # Usage
//!
//! ```bash
//! export ALPHA_VANTAGE_API_KEY="your-key"
//! cargo run --bin alphavantage-mcp -- --rate-limit 5
//! ```

use anyhow::Context;
use av_stock::{AlphaVantageClient, SERVER_NAME, StockConfig, build_server};
use av_utils::{LogContext, LogFormat, init_tracing};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "alphavantage-mcp", version)]
#[command(about = "MCP server exposing Alpha Vantage stock data", long_about = None)]
struct Args {
    /// Alpha Vantage base URL (overrides ALPHA_VANTAGE_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Attempts per request, 1 disables retries (overrides ALPHA_VANTAGE_MAX_ATTEMPTS)
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Requests per minute (overrides ALPHA_VANTAGE_RATE_LIMIT)
    #[arg(long)]
    rate_limit: Option<u32>,

    /// Request timeout in seconds (overrides ALPHA_VANTAGE_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn config(&self) -> av_stock::Result<StockConfig> {
        let mut builder = StockConfig::builder().with_env()?;

        if let Some(url) = &self.base_url {
            builder = builder.base_url(url.clone());
        }
        if let Some(attempts) = self.max_attempts {
            builder = builder.max_attempts(attempts);
        }
        if let Some(limit) = self.rate_limit {
            builder = builder.requests_per_minute(limit);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_tracing(if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    });

    let config = args.config().context("Invalid configuration")?;
    let log = LogContext::new(SERVER_NAME);

    let client = AlphaVantageClient::new(&config, log.with_context("fetcher"))
        .context("Failed to create Alpha Vantage client")?;
    let server = build_server(Arc::new(client), &log).context("Failed to build MCP server")?;

    info!(
        "Starting {} (max attempts: {}, rate limit: {:?})",
        SERVER_NAME, config.max_attempts, config.requests_per_minute
    );

    server.run_stdio().await?;

    info!("Shutting down");
    Ok(())
}
