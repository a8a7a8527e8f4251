//! Agent execution error types.
//!
//! Returned by graph nodes and by `CompiledStateGraph::invoke`. Tool failures are not
//! errors at this level: they are turned into tool message content so the model can react.

use thiserror::Error;

/// Agent execution error.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. LLM transport failure, empty graph).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// Every model attempt came back empty; the invocation is aborted.
    #[error("failed to call model after {attempts} attempts")]
    ModelExhausted { attempts: usize },

    /// The graph ran more node steps than its recursion limit allows.
    #[error("recursion limit of {0} node steps reached without hitting END")]
    RecursionLimit(usize),
}
