//! Error types for MCP operations

use rmcp::ErrorData;
use rmcp::model::ErrorCode;
use thiserror::Error;

/// Errors that can occur while serving MCP requests
#[derive(Error, Debug)]
pub enum MCPError {
    /// Input frame rejected before it reached the protocol layer
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Request parameters do not match the method
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Tool name is not registered
    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    /// No resource template matches the URI
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// A resource handler failed
    #[error("{0}")]
    ResourceReadFailed(String),

    /// Invalid URI template
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// The MCP session could not start or ended abnormally
    #[error("Service error: {0}")]
    ServiceError(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error on the transport
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl MCPError {
    /// JSON-RPC error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidFrame(_) => ErrorCode::PARSE_ERROR,
            Self::InvalidParams(_) | Self::ToolNotFound(_) => ErrorCode::INVALID_PARAMS,
            Self::ResourceNotFound(_) => ErrorCode::RESOURCE_NOT_FOUND,
            _ => ErrorCode::INTERNAL_ERROR,
        }
    }
}

impl From<MCPError> for ErrorData {
    fn from(err: MCPError) -> Self {
        ErrorData::new(err.code(), err.to_string(), None)
    }
}
