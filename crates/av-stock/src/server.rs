//! Wiring of tools and resources into an MCP server

use av_mcp::McpServer;
use av_utils::LogContext;
use std::sync::Arc;

use crate::api::MarketDataFetcher;
use crate::dispatcher::StockDispatcher;
use crate::resources::StockResource;
use crate::tools::{DailyStockDataTool, StockAlertsTool, StockDataTool};

pub const SERVER_NAME: &str = "alphavantage-mcp";

const INSTRUCTIONS: &str = "Stock market data from Alpha Vantage. Use get-stock-data for \
intraday or daily bars, get-daily-stock-data for daily bars and get-stock-alerts to find \
large daily price moves. Series are also readable as stock://{symbol}/{interval}.";

/// Build the server with every tool and the `stock://` resource template
pub fn build_server(
    fetcher: Arc<dyn MarketDataFetcher>,
    log: &LogContext,
) -> av_mcp::Result<McpServer> {
    let dispatcher = StockDispatcher::new(fetcher, log.with_context("dispatcher"));

    Ok(McpServer::builder()
        .name(SERVER_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .instructions(INSTRUCTIONS)
        .tool(Arc::new(StockDataTool::new(dispatcher.clone())))
        .tool(Arc::new(DailyStockDataTool::new(dispatcher.clone())))
        .tool(Arc::new(StockAlertsTool::new(dispatcher.clone())))
        .resource_template(Arc::new(StockResource::new(dispatcher)?))
        .log_context(log.with_context("server"))
        .build())
}
