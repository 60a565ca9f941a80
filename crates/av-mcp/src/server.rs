//! MCP server: tool and resource routing on top of the rmcp service
//!
//! The SDK owns the session (initialization, ping, request ids, concurrency).
//! [`McpServer`] answers the tool and resource methods and hands the rest to
//! the SDK defaults.

use av_utils::LogContext;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, ListResourceTemplatesResult,
    ListToolsResult, PaginatedRequestParam, ProtocolVersion, ReadResourceRequestParam,
    ReadResourceResult, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, ServiceExt};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{Instrument, debug, info, warn};

use crate::Result;
use crate::error::MCPError;
use crate::resource::ResourceTemplate;
use crate::tool::{Tool, ToolRegistry, error_result};
use crate::transport::filter_frames;

/// MCP server exposing tools and resource templates
#[derive(Clone)]
pub struct McpServer {
    name: String,
    version: String,
    instructions: Option<String>,
    tools: ToolRegistry,
    templates: Vec<Arc<dyn ResourceTemplate>>,
    log: LogContext,
}

/// Builder for [`McpServer`]
pub struct McpServerBuilder {
    name: String,
    version: String,
    instructions: Option<String>,
    tools: ToolRegistry,
    templates: Vec<Arc<dyn ResourceTemplate>>,
    log: Option<LogContext>,
}

impl Default for McpServerBuilder {
    fn default() -> Self {
        Self {
            name: "mcp-server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            instructions: None,
            tools: ToolRegistry::new(),
            templates: Vec::new(),
            log: None,
        }
    }
}

impl McpServerBuilder {
    /// Server name reported in `initialize`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Server version reported in `initialize`
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Usage hints for the agent, sent with `initialize`
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn resource_template(mut self, template: Arc<dyn ResourceTemplate>) -> Self {
        self.templates.push(template);
        self
    }

    pub fn log_context(mut self, log: LogContext) -> Self {
        self.log = Some(log);
        self
    }

    pub fn build(self) -> McpServer {
        let log = self.log.unwrap_or_else(|| LogContext::new(&self.name));
        McpServer {
            name: self.name,
            version: self.version,
            instructions: self.instructions,
            tools: self.tools,
            templates: self.templates,
            log,
        }
    }
}

impl McpServer {
    pub fn builder() -> McpServerBuilder {
        McpServerBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tool definitions in registration order
    pub fn tool_definitions(&self) -> Vec<rmcp::model::Tool> {
        self.tools.definitions()
    }

    /// Resource template definitions in registration order
    pub fn template_definitions(&self) -> Result<Vec<rmcp::model::ResourceTemplate>> {
        self.templates.iter().map(|t| t.definition()).collect()
    }

    /// Run a tool; a failing tool yields an error result, an unknown name an `Err`
    pub async fn call_tool_by_name(
        &self,
        name: &str,
        arguments: rmcp::model::JsonObject,
    ) -> Result<CallToolResult> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| MCPError::ToolNotFound(name.to_string()))?;

        debug!("Calling tool: {}", name);
        match tool.call(arguments).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("Tool '{}' failed: {}", name, e);
                Ok(error_result(e.to_string()))
            }
        }
    }

    /// Read the resource addressed by `uri` through the first matching template
    pub async fn read_uri(&self, uri: &str) -> Result<ReadResourceResult> {
        let (template, variables) = self
            .templates
            .iter()
            .find_map(|t| t.uri_template().matches(uri).map(|vars| (t, vars)))
            .ok_or_else(|| MCPError::ResourceNotFound(uri.to_string()))?;

        debug!("Reading resource: {}", uri);
        let contents = template.read(uri, variables).await?;
        Ok(ReadResourceResult { contents })
    }

    /// Serve MCP over `input`/`output` until the input ends
    pub async fn run<R, W>(self, input: R, output: W) -> Result<()>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let log = self.log.clone();
        info!(
            "{} v{} serving {} tools and {} resource templates",
            self.name,
            self.version,
            self.tools.len(),
            self.templates.len()
        );

        let reader = filter_frames(input, &log);
        let service = ServiceExt::serve(self, (reader, output))
            .instrument(log.span())
            .await
            .map_err(|e| MCPError::ServiceError(e.to_string()))?;

        let reason = service
            .waiting()
            .await
            .map_err(|e| MCPError::ServiceError(e.to_string()))?;
        info!("Session ended: {:?}", reason);
        Ok(())
    }

    /// Serve over the process stdin/stdout
    pub async fn run_stdio(self) -> Result<()> {
        let (stdin, stdout) = rmcp::transport::stdio();
        self.run(stdin, stdout).await
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: self.name.clone(),
                version: self.version.clone(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: self.instructions.clone(),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tool_definitions()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        let arguments = request.arguments.unwrap_or_default();
        self.call_tool_by_name(&request.name, arguments)
            .instrument(self.log.span())
            .await
            .map_err(ErrorData::from)
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourceTemplatesResult, ErrorData> {
        let templates = self.template_definitions()?;
        Ok(ListResourceTemplatesResult::with_all_items(templates))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ReadResourceResult, ErrorData> {
        self.read_uri(&request.uri)
            .instrument(self.log.span())
            .await
            .inspect_err(|e| warn!("Resource '{}' failed: {}", request.uri, e))
            .map_err(ErrorData::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{TemplateVariables, UriTemplate, text_contents};
    use crate::tool::{schema, text_result};
    use async_trait::async_trait;
    use rmcp::model::{JsonObject, ResourceContents};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        async fn call(&self, arguments: JsonObject) -> Result<CallToolResult> {
            match arguments.get("text").and_then(Value::as_str) {
                Some(text) => Ok(text_result(text.to_uppercase())),
                None => Ok(error_result("text is required")),
            }
        }

        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Upper-case text"
        }

        fn input_schema(&self) -> JsonObject {
            schema(json!({"type": "object", "properties": {"text": {"type": "string"}}}))
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        async fn call(&self, _arguments: JsonObject) -> Result<CallToolResult> {
            Err(MCPError::InvalidParams("exploded".to_string()))
        }

        fn name(&self) -> &str {
            "fail"
        }

        fn description(&self) -> &str {
            "Always fails"
        }

        fn input_schema(&self) -> JsonObject {
            schema(json!({"type": "object"}))
        }
    }

    struct EchoTemplate {
        template: UriTemplate,
    }

    #[async_trait]
    impl ResourceTemplate for EchoTemplate {
        fn uri_template(&self) -> &UriTemplate {
            &self.template
        }

        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the name"
        }

        async fn read(
            &self,
            uri: &str,
            variables: TemplateVariables,
        ) -> Result<Vec<ResourceContents>> {
            let name = variables["name"].as_str().unwrap_or_default();
            if name == "broken" {
                return Err(MCPError::ResourceReadFailed("broken resource".to_string()));
            }
            Ok(vec![text_contents(uri, self.mime_type(), format!("hello {name}"))])
        }
    }

    fn server() -> McpServer {
        McpServer::builder()
            .name("test-server")
            .version("1.2.3")
            .tool(Arc::new(UpperTool))
            .tool(Arc::new(FailingTool))
            .resource_template(Arc::new(EchoTemplate {
                template: UriTemplate::parse("echo://{name}").unwrap(),
            }))
            .build()
    }

    fn args(value: Value) -> JsonObject {
        schema(value)
    }

    #[test]
    fn test_info_advertises_tools_and_resources() {
        let info = serde_json::to_value(server().get_info()).unwrap();

        assert_eq!(info["serverInfo"]["name"], "test-server");
        assert_eq!(info["serverInfo"]["version"], "1.2.3");
        assert!(info["capabilities"]["tools"].is_object());
        assert!(info["capabilities"]["resources"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list_and_call() {
        let server = server();

        let names: Vec<String> = server
            .tool_definitions()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(names, vec!["upper", "fail"]);

        let result = server
            .call_tool_by_name("upper", args(json!({"text": "abc"})))
            .await
            .unwrap();
        let result = serde_json::to_value(result).unwrap();
        assert_eq!(result["content"][0]["text"], "ABC");
        assert_ne!(result["isError"], true);
    }

    #[tokio::test]
    async fn test_tool_failure_is_error_result_not_fault() {
        let result = server()
            .call_tool_by_name("fail", JsonObject::new())
            .await
            .unwrap();
        let result = serde_json::to_value(result).unwrap();

        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"].as_str().unwrap().contains("exploded"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let err = server()
            .call_tool_by_name("nope", JsonObject::new())
            .await
            .unwrap_err();
        assert_eq!(ErrorData::from(err).code.0, -32602);
    }

    #[tokio::test]
    async fn test_resources() {
        let server = server();

        let templates = serde_json::to_value(server.template_definitions().unwrap()).unwrap();
        assert_eq!(templates[0]["uriTemplate"], "echo://{name}");
        assert_eq!(templates[0]["mimeType"], "text/plain");

        let result = server.read_uri("echo://world").await.unwrap();
        let contents = serde_json::to_value(&result.contents).unwrap();
        assert_eq!(contents[0]["text"], "hello world");
        assert_eq!(contents[0]["uri"], "echo://world");
    }

    #[tokio::test]
    async fn test_resource_errors_propagate() {
        let server = server();

        let err = ErrorData::from(server.read_uri("echo://broken").await.unwrap_err());
        assert_eq!(err.code.0, -32603);
        assert_eq!(err.message, "broken resource");

        let err = ErrorData::from(server.read_uri("other://x").await.unwrap_err());
        assert_eq!(err.code.0, -32002);
    }

    /// Reads response lines until every id in `ids` has been answered
    async fn responses<R>(
        lines: &mut tokio::io::Lines<BufReader<R>>,
        ids: &[i64],
    ) -> HashMap<i64, Value>
    where
        R: tokio::io::AsyncRead + Unpin,
    {
        let mut answered = HashMap::new();
        while !ids.iter().all(|id| answered.contains_key(id)) {
            let line = lines.next_line().await.unwrap().expect("output closed early");
            let message: Value = serde_json::from_str(&line).unwrap();
            if let Some(id) = message["id"].as_i64() {
                answered.insert(id, message);
            }
        }
        answered
    }

    #[tokio::test]
    async fn test_session_survives_malformed_frames() {
        let (mut client_in, server_in) = tokio::io::duplex(64 * 1024);
        let (server_out, client_out) = tokio::io::duplex(64 * 1024);
        tokio::spawn(server().run(server_in, server_out));

        let mut frames: Vec<Vec<u8>> = [
            json!({"jsonrpc": "2.0", "id": 0, "method": "initialize",
                   "params": {"protocolVersion": "2024-11-05", "capabilities": {},
                              "clientInfo": {"name": "test-client", "version": "0.1.0"}}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}),
        ]
        .iter()
        .map(|frame| format!("{frame}\n").into_bytes())
        .collect();
        frames.push(b"\xff\xfe\n".to_vec());
        frames.push(b"{\"jsonrpc\":\"2.0\",\"id\":null,\"method\":\"ping\"}\n".to_vec());
        frames.push(b"{not json\n".to_vec());
        frames.push(
            format!(
                "{}\n",
                json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
                       "params": {"name": "upper", "arguments": {"text": "still here"}}})
            )
            .into_bytes(),
        );

        for frame in &frames {
            client_in.write_all(frame).await.unwrap();
        }

        let mut lines = BufReader::new(client_out).lines();
        let answered = responses(&mut lines, &[0, 1, 3]).await;

        assert_eq!(answered[&0]["result"]["serverInfo"]["name"], "test-server");
        assert_eq!(answered[&1]["result"], json!({}));
        assert_eq!(answered[&3]["result"]["content"][0]["text"], "STILL HERE");
    }
}
