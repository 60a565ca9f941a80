//! MCP tools exposing stock data to the agent

pub mod alerts;
pub mod daily;
pub mod stock_data;

pub use alerts::StockAlertsTool;
pub use daily::DailyStockDataTool;
pub use stock_data::StockDataTool;

use av_mcp::{CallToolResult, error_result, text_result};
use serde_json::{Value, json};

use crate::error::Result;

/// Text result on success, error result (`isError: true`) otherwise
fn into_tool_result(outcome: Result<String>, context: &str) -> CallToolResult {
    match outcome {
        Ok(text) => text_result(text),
        Err(e) => {
            tracing::warn!("{}: {}", context, e);
            error_result(format!("{context}: {e}"))
        }
    }
}

fn symbol_schema() -> Value {
    json!({
        "type": "string",
        "description": "Stock ticker symbol (e.g., 'IBM', 'AAPL')"
    })
}

fn outputsize_schema() -> Value {
    json!({
        "type": "string",
        "description": "'compact' returns the latest 100 data points, 'full' the full history",
        "enum": ["compact", "full"],
        "default": "compact"
    })
}

/// Text of the first content block and the `isError` flag
#[cfg(test)]
fn result_text(result: &CallToolResult) -> (String, bool) {
    let value = serde_json::to_value(result).unwrap();
    let text = value["content"][0]["text"].as_str().unwrap_or_default().to_string();
    (text, value["isError"] == json!(true))
}
