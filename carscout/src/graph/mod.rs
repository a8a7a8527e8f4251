//! State graph: nodes + edges (plain and conditional), compile and invoke.
//!
//! Build a [`StateGraph`], add nodes and edges using [`START`] / [`END`], compile it,
//! then call [`CompiledStateGraph::invoke`] with the initial state.

mod compile_error;
mod compiled;
mod conditional;
mod logging;
mod logging_middleware;
mod next;
mod node;
mod node_middleware;
mod state_graph;
mod updater;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
pub use logging_middleware::LoggingNodeMiddleware;
pub use next::Next;
pub use node::Node;
pub use node_middleware::NodeMiddleware;
pub use state_graph::{StateGraph, END, START};
pub use updater::{BoxedStateUpdater, FieldBasedUpdater, ReplaceUpdater, StateUpdater};
