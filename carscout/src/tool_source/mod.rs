//! Tool source abstraction: list tools and call a tool by name.
//!
//! The tool-dispatch node depends on [`ToolSource`] rather than a concrete registry;
//! [`ToolRegistry`](crate::tools::ToolRegistry) is the implementation used in practice.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Tool specification offered to the model (name, description, JSON Schema of arguments).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

/// Result text of a single tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallContent {
    pub text: String,
}

/// Errors from resolving or calling a tool.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
}

impl ToolSourceError {
    /// JSON error record used as tool content when a call cannot run.
    pub fn to_error_payload(&self) -> String {
        let category = match self {
            Self::NotFound(_) => "Tool Not Found",
            Self::InvalidInput(_) => "Invalid Arguments",
        };
        serde_json::json!({ "error": category, "details": self.to_string() }).to_string()
    }
}

/// Lists tools and calls them by name.
#[async_trait]
pub trait ToolSource: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    async fn call_tool(
        &self,
        name: &str,
        args: Map<String, Value>,
    ) -> Result<ToolCallContent, ToolSourceError>;
}
