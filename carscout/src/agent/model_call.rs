//! Model-call node: build the prompt, call the LLM with bounded retries on empty
//! replies, and append the reply.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::{InvokeOptions, LlmClient, LlmResponse};
use crate::message::Message;
use crate::state::ConversationState;

use super::prompt::{search_prompt, SYSTEM_PROMPT};
use super::MODEL_CALL;

/// Attempts per model call before the invocation is aborted.
pub const MAX_LLM_RETRIES: usize = 3;

/// Output-token caps per phase. Emitting a tool call needs far fewer tokens than a summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenBudget {
    /// First call, which only has to request the listings tool.
    pub tool_phase: u32,
    /// Later calls, which summarize the tool output.
    pub summary_phase: u32,
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self {
            tool_phase: 32,
            summary_phase: 4000,
        }
    }
}

/// Calls `llm` up to `max_attempts` times and returns the first non-empty reply.
///
/// Client errors propagate immediately; only empty replies are retried.
pub(crate) async fn invoke_with_retries(
    llm: &dyn LlmClient,
    messages: &[Message],
    options: &InvokeOptions,
    max_attempts: usize,
) -> Result<LlmResponse, AgentError> {
    for attempt in 1..=max_attempts {
        let response = llm.invoke(messages, options).await?;
        if !response.is_empty() {
            debug!(attempt, tool_calls = response.tool_calls.len(), "model reply accepted");
            return Ok(response);
        }
        warn!(attempt, max_attempts, "model returned an empty response");
    }
    Err(AgentError::ModelExhausted {
        attempts: max_attempts,
    })
}

pub struct ModelCallNode {
    llm: Arc<dyn LlmClient>,
    budget: TokenBudget,
    max_attempts: usize,
}

impl ModelCallNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            budget: TokenBudget::default(),
            max_attempts: MAX_LLM_RETRIES,
        }
    }

    pub fn with_budget(mut self, budget: TokenBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Attempts per call; values below 1 are raised to 1.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Request messages, options, and the messages to persist before the reply.
    fn prepare(&self, state: &ConversationState) -> (Vec<Message>, InvokeOptions, Vec<Message>) {
        let system = Message::system(SYSTEM_PROMPT);
        if state.messages.is_empty() {
            let prompt = Message::user(search_prompt(&state.request));
            (
                vec![system, prompt.clone()],
                InvokeOptions::with_max_completion_tokens(self.budget.tool_phase),
                vec![prompt],
            )
        } else {
            let mut request = Vec::with_capacity(state.messages.len() + 1);
            request.push(system);
            request.extend(state.messages.iter().cloned());
            (
                request,
                InvokeOptions::with_max_completion_tokens(self.budget.summary_phase),
                Vec::new(),
            )
        }
    }
}

#[async_trait]
impl Node<ConversationState> for ModelCallNode {
    fn id(&self) -> &str {
        MODEL_CALL
    }

    async fn run(&self, state: ConversationState) -> Result<(ConversationState, Next), AgentError> {
        let (request, options, mut appended) = self.prepare(&state);
        let response =
            invoke_with_retries(self.llm.as_ref(), &request, &options, self.max_attempts).await?;
        appended.push(response.into_message());
        Ok((state.delta(appended), Next::Continue))
    }
}
