//! # Carscout
//!
//! A small tool-calling agent that turns a structured vehicle search (make, model, year,
//! ZIP code, radius) into a natural-language summary of live listings.
//!
//! The agent is a two-node [`StateGraph`]: [`ModelCallNode`] asks the language model to
//! call the `search_auto_dev` tool, [`ToolDispatchNode`] runs the requested tool calls and
//! feeds their output back, and the model is called again to summarize. One shared
//! [`ConversationState`] flows through both nodes; messages are append-only.
//!
//! ## Main modules
//!
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Next`], [`StateUpdater`].
//! - [`agent`]: [`ModelCallNode`], [`ToolDispatchNode`], [`has_tool_calls`], [`SearchAgent`],
//!   [`ConnectivityProbe`].
//! - [`llm`]: [`LlmClient`] trait, [`MockLlm`], [`ChatOpenAI`].
//! - [`listings`]: [`ListingsClient`], [`ListingsResult`], [`ListingsError`].
//! - [`tools`]: [`Tool`] trait, [`ToolRegistry`], [`SearchListingsTool`].
//! - [`tool_source`]: [`ToolSpec`], [`ToolCallContent`], [`ToolSourceError`].
//! - [`state`]: [`SearchRequest`], [`ConversationState`].
//! - [`message`]: [`Message`], [`ToolCall`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use carscout::agent::default_registry;
//! use carscout::{ListingsClient, ListingsConfig, MockLlm, SearchAgent, SearchRequest};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let request = SearchRequest::new("Toyota", "Camry", 2025, "75080");
//! let llm = MockLlm::listing_search_then(&request, "No listings found.");
//! let tools = default_registry(ListingsClient::new(ListingsConfig::default())?);
//! let agent = SearchAgent::builder(Arc::new(llm), Arc::new(tools)).build()?;
//! let state = agent.run(request).await?;
//! println!("{}", state.summary().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod error;
pub mod graph;
pub mod listings;
pub mod llm;
pub mod message;
pub mod state;
pub mod tool_source;
pub mod tools;

pub use agent::{
    default_registry, has_tool_calls, ConnectivityProbe, ModelCallNode, RunError, SearchAgent,
    SearchAgentBuilder, TokenBudget, ToolDispatchNode, MAX_LLM_RETRIES, MODEL_CALL, TOOL_DISPATCH,
};
pub use error::AgentError;
pub use graph::{
    CompilationError, CompiledStateGraph, FieldBasedUpdater, LoggingNodeMiddleware, Next, Node,
    NodeMiddleware, ReplaceUpdater, StateGraph, StateUpdater, END, START,
};
pub use listings::{ListingsClient, ListingsConfig, ListingsError, ListingsResult};
pub use llm::{search_call, ChatOpenAI, InvokeOptions, LlmClient, LlmResponse, LlmUsage, MockLlm};
pub use message::{Message, ToolCall};
pub use state::{append_messages_updater, ConversationState, SearchRequest, DEFAULT_DISTANCE};
pub use tool_source::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};
pub use tools::{SearchListingsTool, Tool, ToolRegistry, SEARCH_LISTINGS_TOOL};
