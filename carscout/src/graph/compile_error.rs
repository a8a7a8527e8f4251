//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when edges reference unknown nodes, the entry is
//! ambiguous, or END cannot be reached.

use thiserror::Error;

/// Error when compiling a state graph.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// A node id in an edge was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No edge leaves START.
    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// Neither a plain edge nor a conditional route leads to END.
    #[error("graph has no path to END")]
    MissingEnd,

    /// Edges are ambiguous (several edges from START or from one node) or a plain chain loops.
    #[error("invalid edges: {0}")]
    InvalidEdges(String),

    /// A node has both an outgoing edge and conditional edges; it must have exactly one.
    #[error("node has both edge and conditional edges: {0}")]
    NodeHasBothEdgeAndConditional(String),

    /// A value in a conditional path_map is not a valid node id or END.
    #[error("conditional path_map invalid target: {0}")]
    InvalidConditionalPathMap(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display of NodeNotFound contains "node not found" and the node id.
    #[test]
    fn display_node_not_found() {
        let s = CompilationError::NodeNotFound("tool_dispatch".to_string()).to_string();
        assert!(s.contains("node not found"), "{}", s);
        assert!(s.contains("tool_dispatch"), "{}", s);
    }

    /// **Scenario**: MissingStart and MissingEnd mention START / END.
    #[test]
    fn display_missing_start_and_end() {
        assert!(CompilationError::MissingStart.to_string().contains("START"));
        assert!(CompilationError::MissingEnd.to_string().contains("END"));
    }
}
