//! Tool trait and registry

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Content, JsonObject};
use serde_json::Value;
use std::sync::Arc;

use crate::Result;

/// A named operation exposed to the agent through `tools/call`
///
/// Implementations should report domain failures as an error result
/// (see [`error_result`]) rather than `Err`; an `Err` is still caught by the
/// server and turned into an error result.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with the `arguments` object of the call
    async fn call(&self, arguments: JsonObject) -> Result<CallToolResult>;

    /// Unique tool name
    fn name(&self) -> &str;

    /// Description shown to the agent
    fn description(&self) -> &str;

    /// JSON Schema of `arguments`
    fn input_schema(&self) -> JsonObject;

    /// Definition as listed by `tools/list`
    fn definition(&self) -> rmcp::model::Tool {
        rmcp::model::Tool::new(
            self.name().to_string(),
            self.description().to_string(),
            Arc::new(self.input_schema()),
        )
    }
}

/// Single text block
pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Single text block flagged `isError`
pub fn error_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(text.into())])
}

/// Unwrap a `json!` object literal into a schema; anything else is an empty schema
pub fn schema(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}

/// Registry of tools, listed in registration order
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        if let Some(slot) = self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            *slot = tool;
        } else {
            self.tools.push(tool);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn definitions(&self) -> Vec<rmcp::model::Tool> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool {
        name: &'static str,
        reply: &'static str,
    }

    #[async_trait]
    impl Tool for EchoTool {
        async fn call(&self, _arguments: JsonObject) -> Result<CallToolResult> {
            Ok(text_result(self.reply))
        }

        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "echo"
        }

        fn input_schema(&self) -> JsonObject {
            schema(json!({"type": "object"}))
        }
    }

    #[test]
    fn test_registry_keeps_order_and_replaces() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(EchoTool { name: "b", reply: "1" }));
        registry.register(Arc::new(EchoTool { name: "a", reply: "2" }));
        registry.register(Arc::new(EchoTool { name: "b", reply: "3" }));

        assert_eq!(registry.len(), 2);
        let names: Vec<_> = registry
            .definitions()
            .into_iter()
            .map(|d| d.name.to_string())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_registry_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool { name: "echo", reply: "hi" }));

        let tool = registry.get("echo").unwrap();
        let result = tool.call(JsonObject::new()).await.unwrap();
        let result = serde_json::to_value(result).unwrap();
        assert_eq!(result["content"][0]["text"], "hi");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_definition_uses_schema() {
        let tool = EchoTool { name: "echo", reply: "" };
        let def = serde_json::to_value(tool.definition()).unwrap();
        assert_eq!(def["name"], "echo");
        assert_eq!(def["description"], "echo");
        assert_eq!(def["inputSchema"]["type"], "object");
    }

    #[test]
    fn test_error_result_is_flagged() {
        let result = serde_json::to_value(error_result("boom")).unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["text"], "boom");

        assert!(schema(json!("not an object")).is_empty());
    }
}
