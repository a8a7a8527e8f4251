//! Connectivity probe: a one-node graph that asks the model a trivial question.
//!
//! Used by `carscout ping` to check the model endpoint before running searches.

use std::sync::Arc;

use async_trait::async_trait;
use env_config::AppConfig;

use crate::error::AgentError;
use crate::graph::{CompiledStateGraph, Next, Node, StateGraph, END, START};
use crate::llm::{ChatOpenAI, InvokeOptions, LlmClient};
use crate::message::Message;

use super::model_call::{invoke_with_retries, TokenBudget, MAX_LLM_RETRIES};
use super::prompt::{PROBE_QUESTION, PROBE_SYSTEM_PROMPT};
use super::RunError;

const PROBE: &str = "probe";

/// Probe conversation: the question and the model's answer.
#[derive(Clone, Debug, Default)]
pub struct ProbeState {
    pub messages: Vec<Message>,
}

struct ProbeNode {
    llm: Arc<dyn LlmClient>,
    max_completion_tokens: u32,
}

#[async_trait]
impl Node<ProbeState> for ProbeNode {
    fn id(&self) -> &str {
        PROBE
    }

    async fn run(&self, state: ProbeState) -> Result<(ProbeState, Next), AgentError> {
        let question = Message::user(PROBE_QUESTION);
        let request = [Message::system(PROBE_SYSTEM_PROMPT), question.clone()];
        let options = InvokeOptions::with_max_completion_tokens(self.max_completion_tokens);
        let response =
            invoke_with_retries(self.llm.as_ref(), &request, &options, MAX_LLM_RETRIES).await?;
        let mut messages = state.messages;
        messages.push(question);
        messages.push(response.into_message());
        Ok((ProbeState { messages }, Next::End))
    }
}

pub struct ConnectivityProbe {
    graph: CompiledStateGraph<ProbeState>,
}

impl ConnectivityProbe {
    /// Probe with the default summary-phase token cap.
    pub fn new(llm: Arc<dyn LlmClient>) -> Result<Self, RunError> {
        Self::with_max_tokens(llm, TokenBudget::default().summary_phase)
    }

    pub fn with_max_tokens(llm: Arc<dyn LlmClient>, max_completion_tokens: u32) -> Result<Self, RunError> {
        let node = ProbeNode {
            llm,
            max_completion_tokens,
        };
        let mut graph = StateGraph::<ProbeState>::new();
        graph
            .add_node(PROBE, Arc::new(node))
            .add_edge(START, PROBE)
            .add_edge(PROBE, END);
        Ok(Self {
            graph: graph.compile()?,
        })
    }

    /// Probe against the configured model endpoint (no tools bound), capped at the
    /// configured summary budget.
    pub fn from_config(config: &AppConfig) -> Result<Self, RunError> {
        let llm = ChatOpenAI::new(config.llm_base_url()?, &config.llm_api_key, &config.llm_model);
        Self::with_max_tokens(Arc::new(llm), config.summary_max_tokens)
    }

    /// Returns the model's answer text.
    pub async fn run(&self) -> Result<String, RunError> {
        let state = self.graph.invoke(ProbeState::default()).await?;
        Ok(state
            .messages
            .last()
            .map(|m| m.content().to_string())
            .unwrap_or_default())
    }
}
