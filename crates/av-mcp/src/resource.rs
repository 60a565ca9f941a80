//! Resource templates and URI template matching
//!
//! A template such as `stock://{symbol}/{interval}` is compiled into an
//! anchored regular expression with one capture group per variable. Each
//! variable matches a single path segment. A variable written `{name*}` is
//! exploded: its segment is split on `,` and handed to the handler as a JSON
//! array, which is why handlers must accept list-wrapped scalars.

use async_trait::async_trait;
use regex::Regex;
use rmcp::model::ResourceContents;
use serde_json::{Map, Value, json};

use crate::Result;
use crate::error::MCPError;

/// Variables extracted from a URI, keyed by name
pub type TemplateVariables = Map<String, Value>;

#[derive(Debug, Clone)]
struct TemplateVariable {
    name: String,
    explode: bool,
}

/// Compiled URI template
#[derive(Debug, Clone)]
pub struct UriTemplate {
    template: String,
    regex: Regex,
    variables: Vec<TemplateVariable>,
}

impl UriTemplate {
    /// Compile a template
    pub fn parse(template: &str) -> Result<Self> {
        let mut pattern = String::from("^");
        let mut variables: Vec<TemplateVariable> = Vec::new();
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            pattern.push_str(&regex::escape(&rest[..start]));

            let after = &rest[start + 1..];
            let end = after.find('}').ok_or_else(|| {
                MCPError::InvalidPattern(format!("unclosed '{{' in {template}"))
            })?;

            let raw = &after[..end];
            let (name, explode) = match raw.strip_suffix('*') {
                Some(name) => (name, true),
                None => (raw, false),
            };

            if !is_valid_name(name) {
                return Err(MCPError::InvalidPattern(format!(
                    "invalid variable name '{raw}' in {template}"
                )));
            }
            if variables.iter().any(|v| v.name == name) {
                return Err(MCPError::InvalidPattern(format!(
                    "duplicate variable '{name}' in {template}"
                )));
            }

            pattern.push_str(&format!("(?P<{name}>[^/]+)"));
            variables.push(TemplateVariable {
                name: name.to_string(),
                explode,
            });
            rest = &after[end + 1..];
        }

        if rest.contains('}') {
            return Err(MCPError::InvalidPattern(format!(
                "unmatched '}}' in {template}"
            )));
        }
        pattern.push_str(&regex::escape(rest));
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|e| MCPError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            template: template.to_string(),
            regex,
            variables,
        })
    }

    /// Match a concrete URI, returning its variables
    pub fn matches(&self, uri: &str) -> Option<TemplateVariables> {
        let captures = self.regex.captures(uri)?;
        let mut vars = Map::new();

        for var in &self.variables {
            let raw = captures.name(&var.name)?.as_str();
            let value = if var.explode {
                Value::Array(
                    raw.split(',')
                        .map(|part| Value::String(part.to_string()))
                        .collect(),
                )
            } else {
                Value::String(raw.to_string())
            };
            vars.insert(var.name.clone(), value);
        }

        Some(vars)
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Variable names in template order
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|v| v.name.as_str())
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Text contents of a resource read
pub fn text_contents(uri: &str, mime_type: &str, text: String) -> ResourceContents {
    let mut contents = ResourceContents::text(text, uri);
    if let ResourceContents::TextResourceContents { mime_type: mime, .. } = &mut contents {
        *mime = Some(mime_type.to_string());
    }
    contents
}

/// Addressable content exposed through `resources/read`
///
/// Errors returned from [`ResourceTemplate::read`] are sent to the client as
/// JSON-RPC errors.
#[async_trait]
pub trait ResourceTemplate: Send + Sync {
    fn uri_template(&self) -> &UriTemplate;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn mime_type(&self) -> &str {
        "text/plain"
    }

    /// Read the resource at `uri`, whose variables already matched the template
    async fn read(&self, uri: &str, variables: TemplateVariables) -> Result<Vec<ResourceContents>>;

    /// Definition as listed by `resources/templates/list`
    fn definition(&self) -> Result<rmcp::model::ResourceTemplate> {
        let definition = json!({
            "uriTemplate": self.uri_template().as_str(),
            "name": self.name(),
            "description": self.description(),
            "mimeType": self.mime_type(),
        });
        Ok(serde_json::from_value(definition)?)
    }
}
