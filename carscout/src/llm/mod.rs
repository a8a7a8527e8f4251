//! LLM client abstraction for the model-call node.
//!
//! The node hands over the message list plus per-call [`InvokeOptions`] (the output
//! budget differs between the tool-triggering and summarizing phases) and gets back
//! assistant text and optional tool calls.

mod mock;
mod openai;

pub use mock::{search_call, MockLlm, RecordedCall};
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::{Message, ToolCall};

/// Per-call sampling options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvokeOptions {
    /// Cap on generated tokens; `None` leaves the provider default.
    pub max_completion_tokens: Option<u32>,
}

impl InvokeOptions {
    pub fn with_max_completion_tokens(max: u32) -> Self {
        Self {
            max_completion_tokens: Some(max),
        }
    }
}

/// Token usage for one LLM call.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response from one completion: assistant text and optional tool calls.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LlmResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub usage: Option<LlmUsage>,
}

impl LlmResponse {
    /// Plain text answer with no tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Reply that only requests tool calls.
    pub fn with_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::default()
        }
    }

    /// A reply with neither text nor tool calls. The model-call node retries these.
    ///
    /// Any text counts, whitespace included.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.tool_calls.is_empty()
    }

    /// Converts the reply into the assistant message appended to the conversation.
    pub fn into_message(self) -> Message {
        Message::assistant_with_tool_calls(self.content, self.tool_calls)
    }
}

/// LLM client: given messages, returns assistant text and optional tool calls.
///
/// Implementations: [`MockLlm`] (scripted replies), [`ChatOpenAI`] (OpenAI-compatible API).
/// Implementations must be safe to share across concurrent invocations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(
        &self,
        messages: &[Message],
        options: &InvokeOptions,
    ) -> Result<LlmResponse, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    /// **Scenario**: Only a reply with no text at all and no tool calls is empty;
    /// whitespace text or a tool call alone is a real reply.
    #[test]
    fn is_empty_checks_text_and_tool_calls() {
        assert!(LlmResponse::default().is_empty());
        assert!(LlmResponse::text("").is_empty());
        assert!(!LlmResponse::text("  \n").is_empty());
        assert!(!LlmResponse::text("ok").is_empty());
        let call = ToolCall::new("c1", "search_auto_dev", Map::new());
        assert!(!LlmResponse::with_tool_calls(vec![call]).is_empty());
    }

    /// **Scenario**: into_message keeps tool calls on the assistant message.
    #[test]
    fn into_message_keeps_tool_calls() {
        let call = ToolCall::new("c1", "search_auto_dev", Map::new());
        let msg = LlmResponse::with_tool_calls(vec![call.clone()]).into_message();
        assert_eq!(msg.tool_calls(), &[call]);
    }
}
