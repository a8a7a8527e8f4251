//! Tool-dispatch node: run every tool call on the last assistant message and append
//! one tool message per call, in call order.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::message::{Message, ToolCall};
use crate::state::ConversationState;
use crate::tool_source::ToolSource;

use super::TOOL_DISPATCH;

const LOG_PREVIEW_CHARS: usize = 200;

fn truncate_for_log(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    }
}

pub struct ToolDispatchNode {
    tools: Arc<dyn ToolSource>,
}

impl ToolDispatchNode {
    pub fn new(tools: Arc<dyn ToolSource>) -> Self {
        Self { tools }
    }

    /// Runs one call. Failures become an error record in the content so the model sees them.
    async fn dispatch(&self, call: &ToolCall) -> Message {
        let content = match self.tools.call_tool(&call.name, call.args.clone()).await {
            Ok(out) => out.text,
            Err(e) => {
                warn!(tool = %call.name, call_id = %call.id, error = %e, "tool call failed");
                e.to_error_payload()
            }
        };
        debug!(
            tool = %call.name,
            call_id = %call.id,
            content = %truncate_for_log(&content, LOG_PREVIEW_CHARS),
            "tool result"
        );
        Message::tool(call.id.clone(), call.name.clone(), content)
    }
}

#[async_trait]
impl Node<ConversationState> for ToolDispatchNode {
    fn id(&self) -> &str {
        TOOL_DISPATCH
    }

    async fn run(&self, state: ConversationState) -> Result<(ConversationState, Next), AgentError> {
        let calls = state
            .last_message()
            .map(|m| m.tool_calls().to_vec())
            .unwrap_or_default();
        if calls.is_empty() {
            return Err(AgentError::ExecutionFailed(
                "tool_dispatch reached without pending tool calls".into(),
            ));
        }

        // join_all keeps output order equal to input order.
        let results = join_all(calls.iter().map(|call| self.dispatch(call))).await;
        Ok((state.delta(results), Next::Continue))
    }
}
