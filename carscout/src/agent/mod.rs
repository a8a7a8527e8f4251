//! The listing-search agent: model-call and tool-dispatch nodes, the router between
//! them, the compiled runner, and a one-shot connectivity probe.
//!
//! Graph: `START → model_call`; `model_call → tool_dispatch` when the last message
//! carries tool calls, else `END`; `tool_dispatch → model_call`.

mod model_call;
mod probe;
mod prompt;
mod runner;
mod tool_dispatch;

pub use model_call::{ModelCallNode, TokenBudget, MAX_LLM_RETRIES};
pub use probe::{ConnectivityProbe, ProbeState};
pub use prompt::{search_prompt, PROBE_QUESTION, PROBE_SYSTEM_PROMPT, SYSTEM_PROMPT};
pub use runner::{default_registry, RunError, SearchAgent, SearchAgentBuilder};
pub use tool_dispatch::ToolDispatchNode;

use crate::graph::END;
use crate::state::ConversationState;

/// Node id of the model call.
pub const MODEL_CALL: &str = "model_call";
/// Node id of the tool dispatch.
pub const TOOL_DISPATCH: &str = "tool_dispatch";

/// Router after `model_call`: [`TOOL_DISPATCH`] when the last message requests tools, else [`END`].
pub fn has_tool_calls(state: &ConversationState) -> String {
    let pending = state
        .last_message()
        .map_or(false, |m| !m.tool_calls().is_empty());
    if pending {
        TOOL_DISPATCH.to_string()
    } else {
        END.to_string()
    }
}
