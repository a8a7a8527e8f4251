use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};

/// A single tool the model can call.
///
/// Each tool has a unique name and a [`ToolSpec`] (description plus JSON Schema).
/// Tools are registered in a [`ToolRegistry`](super::ToolRegistry), which the
/// tool-dispatch node calls through.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use serde_json::{Map, Value};
/// use carscout::tools::Tool;
/// use carscout::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Tool for Echo {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     fn spec(&self) -> ToolSpec {
///         ToolSpec {
///             name: "echo".to_string(),
///             description: Some("Echo the arguments".to_string()),
///             input_schema: serde_json::json!({"type": "object"}),
///         }
///     }
///
///     async fn call(&self, args: Map<String, Value>) -> Result<ToolCallContent, ToolSourceError> {
///         Ok(ToolCallContent { text: Value::Object(args).to_string() })
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name; the model refers to the tool by it.
    fn name(&self) -> &str;

    fn spec(&self) -> ToolSpec;

    /// Runs the tool. Domain failures the model should see belong in the returned
    /// text; `Err` is for calls that could not run at all (e.g. bad arguments).
    async fn call(&self, args: Map<String, Value>) -> Result<ToolCallContent, ToolSourceError>;
}
