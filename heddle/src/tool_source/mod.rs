//! Tool source abstraction: list tools and call a tool.
//!
//! The runtime depends on `ToolSource` instead of a concrete registry; nodes
//! name the subset of listed tools they permit. Implementations here:
//! [`MockToolSource`] for tests and examples; the airline fixture source
//! lives in [`crate::airline`]. Real business tools are supplied by the
//! embedding harness through this trait.

mod mock;

pub use mock::MockToolSource;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Tool specification handed to the LLM.
///
/// Deserializable from YAML so tool definitions can live in data files
/// embedded at compile time.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    /// Tool name, as referenced by node tool permissions.
    pub name: String,
    /// Human-readable description for the LLM.
    pub description: Option<String>,
    /// JSON Schema for arguments.
    pub input_schema: Value,
}

/// Result of a single tool call.
#[derive(Debug, Clone)]
pub struct ToolCallContent {
    /// Result text, folded into the conversation history.
    pub text: String,
}

/// Errors from listing or calling tools.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Tool source: list tools and call a tool by name.
///
/// The runtime uses `list_tools()` once per turn to build the permitted spec
/// list for the current node and `call_tool(name, args)` to execute each
/// tool call the LLM produces.
#[async_trait]
pub trait ToolSource: Send + Sync {
    /// List available tools.
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    /// Call a tool by name with JSON arguments.
    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display of each ToolSourceError variant contains expected keywords.
    #[test]
    fn tool_source_error_display_all_variants() {
        let s = ToolSourceError::NotFound("x".into()).to_string();
        assert!(s.to_lowercase().contains("not found"), "{}", s);
        let s = ToolSourceError::InvalidInput("bad".into()).to_string();
        assert!(s.to_lowercase().contains("invalid"), "{}", s);
        let s = ToolSourceError::Transport("net".into()).to_string();
        assert!(s.to_lowercase().contains("transport"), "{}", s);
    }

    /// **Scenario**: ToolSpec parses from YAML including a JSON-schema mapping.
    #[test]
    fn tool_spec_parses_from_yaml() {
        let yaml = r#"
name: get_time
description: Get current time.
input_schema:
  type: object
  properties: {}
"#;
        let spec: ToolSpec = serde_yaml::from_str(yaml).expect("yaml parses");
        assert_eq!(spec.name, "get_time");
        assert_eq!(spec.input_schema["type"], "object");
    }
}
