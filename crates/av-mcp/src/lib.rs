//! Model Context Protocol (MCP) server for alphavantage-mcp
//!
//! The session itself (initialization, ping, JSON-RPC framing) is served by
//! the `rmcp` SDK. This crate adds:
//! - `tools/list` and `tools/call` backed by [`Tool`] implementations
//! - `resources/templates/list` and `resources/read` backed by
//!   [`ResourceTemplate`] implementations matched through [`UriTemplate`]
//! - an input filter that keeps malformed frames away from the session
//!
//! # Example
//!
//! ```no_run
//! use av_mcp::McpServer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = McpServer::builder()
//!     .name("my-server")
//!     .version("0.1.0")
//!     .build();
//!
//! server.run_stdio().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod resource;
pub mod server;
pub mod tool;
pub mod transport;

pub use error::MCPError;
pub use rmcp::model::{CallToolResult, JsonObject, ResourceContents};
pub use resource::{ResourceTemplate, TemplateVariables, UriTemplate, text_contents};
pub use server::{McpServer, McpServerBuilder};
pub use tool::{Tool, ToolRegistry, error_result, schema, text_result};

/// Result type for MCP operations
pub type Result<T> = std::result::Result<T, MCPError>;
