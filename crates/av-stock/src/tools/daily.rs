//! `get-daily-stock-data`: daily series for a symbol

use async_trait::async_trait;
use av_mcp::{CallToolResult, JsonObject, Tool, schema};
use serde_json::json;

use super::{into_tool_result, outputsize_schema, symbol_schema};
use crate::dispatcher::StockDispatcher;
use crate::params::{Interval, QueryParams};

/// Tool returning the latest daily bars; any `interval` argument is ignored
pub struct DailyStockDataTool {
    dispatcher: StockDispatcher,
}

impl DailyStockDataTool {
    pub const NAME: &'static str = "get-daily-stock-data";

    pub fn new(dispatcher: StockDispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl Tool for DailyStockDataTool {
    async fn call(&self, mut arguments: JsonObject) -> av_mcp::Result<CallToolResult> {
        arguments.remove("interval");

        let outcome = match QueryParams::from_map(&arguments, Interval::Daily) {
            Ok(params) => self.dispatcher.stock_data(&params).await,
            Err(e) => Err(e),
        };
        Ok(into_tool_result(outcome, "Error fetching daily stock data"))
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Get daily stock market data for a symbol. Shows the 10 most recent trading days."
    }

    fn input_schema(&self) -> JsonObject {
        schema(json!({
            "type": "object",
            "properties": {
                "symbol": symbol_schema(),
                "outputsize": outputsize_schema()
            },
            "required": ["symbol"]
        }))
    }
}
