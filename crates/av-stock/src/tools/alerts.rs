//! `get-stock-alerts`: significant daily price moves

use async_trait::async_trait;
use av_mcp::{CallToolResult, JsonObject, Tool, schema};
use serde_json::json;

use super::{into_tool_result, symbol_schema};
use crate::dispatcher::StockDispatcher;
use crate::params::{DEFAULT_THRESHOLD, Interval, QueryParams};

/// Tool reporting close-to-close moves at or above a percentage threshold
pub struct StockAlertsTool {
    dispatcher: StockDispatcher,
}

impl StockAlertsTool {
    pub const NAME: &'static str = "get-stock-alerts";

    pub fn new(dispatcher: StockDispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl Tool for StockAlertsTool {
    async fn call(&self, arguments: JsonObject) -> av_mcp::Result<CallToolResult> {
        let outcome = match QueryParams::from_map(&arguments, Interval::Daily) {
            Ok(params) => self.dispatcher.alerts(&params).await,
            Err(e) => Err(e),
        };
        Ok(into_tool_result(outcome, "Error analyzing stock alerts"))
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Get price alerts for a symbol: daily moves over the last 10 trading days \
         whose size meets or exceeds the threshold percentage."
    }

    fn input_schema(&self) -> JsonObject {
        schema(json!({
            "type": "object",
            "properties": {
                "symbol": symbol_schema(),
                "threshold": {
                    "type": "number",
                    "description": "Minimum move in percent that triggers an alert",
                    "exclusiveMinimum": 0,
                    "default": DEFAULT_THRESHOLD
                }
            },
            "required": ["symbol"]
        }))
    }
}
