//! Search runner: wires the two nodes into a compiled graph and runs requests.

use std::collections::HashMap;
use std::sync::Arc;

use env_config::{AppConfig, ConfigError};
use tracing::info;

use crate::error::AgentError;
use crate::graph::{CompilationError, CompiledStateGraph, LoggingNodeMiddleware, StateGraph, END, START};
use crate::listings::{ListingsClient, ListingsConfig};
use crate::llm::{ChatOpenAI, LlmClient};
use crate::state::{append_messages_updater, ConversationState, SearchRequest};
use crate::tool_source::ToolSourceError;
use crate::tools::{SearchListingsTool, ToolRegistry, SEARCH_LISTINGS_TOOL};

use super::model_call::{ModelCallNode, TokenBudget, MAX_LLM_RETRIES};
use super::tool_dispatch::ToolDispatchNode;
use super::{has_tool_calls, MODEL_CALL, TOOL_DISPATCH};

/// Node steps allowed per search unless configured otherwise.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompilationError),
    #[error("execution failed: {0}")]
    Execution(#[from] AgentError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("tool registry: {0}")]
    Tools(#[from] ToolSourceError),
    #[error("http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Registry holding the listings tool.
pub fn default_registry(client: ListingsClient) -> ToolRegistry {
    ToolRegistry::new().with_tool(Box::new(SearchListingsTool::new(client)))
}

pub struct SearchAgentBuilder {
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    budget: TokenBudget,
    max_attempts: usize,
    recursion_limit: Option<usize>,
    required_tools: Vec<String>,
    node_logging: bool,
}

impl SearchAgentBuilder {
    pub fn budget(mut self, budget: TokenBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Node-step cap per search; `None` disables it.
    pub fn recursion_limit(mut self, limit: Option<usize>) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Tool names that must be registered for `build` to succeed.
    pub fn required_tools<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.required_tools = names.into_iter().map(Into::into).collect();
        self
    }

    /// Logs enter/exit of every node at info level.
    pub fn node_logging(mut self, enabled: bool) -> Self {
        self.node_logging = enabled;
        self
    }

    pub fn build(self) -> Result<SearchAgent, RunError> {
        self.tools
            .require(self.required_tools.iter().map(String::as_str))?;

        let model_call = ModelCallNode::new(self.llm)
            .with_budget(self.budget)
            .with_max_attempts(self.max_attempts);
        let tool_dispatch = ToolDispatchNode::new(self.tools);

        let mut graph = StateGraph::<ConversationState>::new();
        graph
            .add_node(MODEL_CALL, Arc::new(model_call))
            .add_node(TOOL_DISPATCH, Arc::new(tool_dispatch))
            .add_edge(START, MODEL_CALL)
            .add_edge(TOOL_DISPATCH, MODEL_CALL);
        let path_map: HashMap<String, String> = [
            (TOOL_DISPATCH.to_string(), TOOL_DISPATCH.to_string()),
            (END.to_string(), END.to_string()),
        ]
        .into_iter()
        .collect();
        graph.add_conditional_edges(MODEL_CALL, Arc::new(has_tool_calls), Some(path_map));

        let mut graph = graph
            .with_state_updater(append_messages_updater())
            .with_recursion_limit(self.recursion_limit);
        if self.node_logging {
            graph = graph.with_middleware(Arc::new(LoggingNodeMiddleware::default()));
        }

        Ok(SearchAgent {
            graph: graph.compile()?,
        })
    }
}

/// Compiled listing-search agent. Shareable across concurrent requests.
#[derive(Clone)]
pub struct SearchAgent {
    graph: CompiledStateGraph<ConversationState>,
}

impl SearchAgent {
    /// Builder with default budgets, 3 attempts per model call, a 25-step cap, and
    /// `search_auto_dev` required in `tools`.
    pub fn builder(llm: Arc<dyn LlmClient>, tools: Arc<ToolRegistry>) -> SearchAgentBuilder {
        SearchAgentBuilder {
            llm,
            tools,
            budget: TokenBudget::default(),
            max_attempts: MAX_LLM_RETRIES,
            recursion_limit: Some(DEFAULT_RECURSION_LIMIT),
            required_tools: vec![SEARCH_LISTINGS_TOOL.to_string()],
            node_logging: false,
        }
    }

    /// Production wiring: listings client, registry and an OpenAI-compatible model from `config`.
    ///
    /// Fails with `RunError::Config` when no model base URL is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, RunError> {
        let client = ListingsClient::new(ListingsConfig::from(config))?;
        let tools = Arc::new(default_registry(client));
        let llm = ChatOpenAI::new(config.llm_base_url()?, &config.llm_api_key, &config.llm_model)
            .with_tools(tools.list());
        info!(model = llm.model(), trace_nodes = config.trace_nodes, "search agent configured");
        Self::builder(Arc::new(llm), tools)
            .budget(TokenBudget {
                tool_phase: config.tool_max_tokens,
                summary_phase: config.summary_max_tokens,
            })
            .recursion_limit(config.max_steps)
            .node_logging(config.trace_nodes)
            .build()
    }

    /// Runs one search from an empty conversation and returns the final state.
    pub async fn run(&self, request: SearchRequest) -> Result<ConversationState, RunError> {
        info!(
            make = %request.make,
            model = %request.model,
            year = request.year,
            zip_code = %request.zip_code,
            distance = request.distance,
            "search started"
        );
        let state = self.graph.invoke(ConversationState::new(request)).await?;
        info!(messages = state.messages.len(), "search finished");
        Ok(state)
    }
}
