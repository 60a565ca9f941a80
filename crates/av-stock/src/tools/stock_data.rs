//! `get-stock-data`: intraday or daily series for a symbol

use async_trait::async_trait;
use av_mcp::{CallToolResult, JsonObject, Tool, schema};
use serde_json::json;

use super::{into_tool_result, outputsize_schema, symbol_schema};
use crate::dispatcher::StockDispatcher;
use crate::params::{Interval, QueryParams};

/// Tool returning the latest bars of a series
pub struct StockDataTool {
    dispatcher: StockDispatcher,
}

impl StockDataTool {
    pub const NAME: &'static str = "get-stock-data";

    pub fn new(dispatcher: StockDispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl Tool for StockDataTool {
    async fn call(&self, arguments: JsonObject) -> av_mcp::Result<CallToolResult> {
        let outcome = match QueryParams::from_map(&arguments, Interval::FiveMin) {
            Ok(params) => self.dispatcher.stock_data(&params).await,
            Err(e) => Err(e),
        };
        Ok(into_tool_result(outcome, "Error fetching stock data"))
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Get stock market data for a symbol at the given interval. \
         Shows the 10 most recent data points."
    }

    fn input_schema(&self) -> JsonObject {
        schema(json!({
            "type": "object",
            "properties": {
                "symbol": symbol_schema(),
                "interval": {
                    "type": "string",
                    "description": "Time between data points",
                    "enum": ["1min", "5min", "15min", "30min", "60min", "daily"],
                    "default": "5min"
                },
                "outputsize": outputsize_schema()
            },
            "required": ["symbol"]
        }))
    }
}
