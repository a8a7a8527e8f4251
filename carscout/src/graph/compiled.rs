//! Compiled state graph: immutable, supports invoke only.
//!
//! Built by `StateGraph::compile`. Runs from the node after START, merges each
//! node's output with the state updater, then follows the router or edge until END.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::AgentError;

use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state, log_state_update,
};
use super::node_middleware::NodeMiddleware;
use super::state_graph::END;
use super::updater::BoxedStateUpdater;
use super::{Next, NextEntry, Node};

/// Compiled graph. Cheap to clone and safe to share across concurrent invocations.
#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) first_node_id: String,
    /// Node id -> how to find its successor.
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    pub(super) middleware: Option<Arc<dyn NodeMiddleware<S>>>,
    pub(super) state_updater: BoxedStateUpdater<S>,
    pub(super) recursion_limit: Option<usize>,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn recursion_limit(&self) -> Option<usize> {
        self.recursion_limit
    }

    async fn run_node(&self, node: Arc<dyn Node<S>>, state: S) -> Result<(S, Next), AgentError> {
        match &self.middleware {
            Some(middleware) => {
                let node_id = node.id().to_string();
                middleware
                    .around_run(
                        &node_id,
                        state,
                        Box::new(move |s| Box::pin(async move { node.run(s).await })),
                    )
                    .await
            }
            None => node.run(state).await,
        }
    }

    fn resolve_next(&self, current_id: &str, state: &S, next: Next) -> Option<String> {
        match self.next_map.get(current_id) {
            Some(NextEntry::Conditional(router)) => {
                let target = router.resolve_next(state);
                tracing::debug!(from = %current_id, to = %target, "conditional routing");
                Some(target)
            }
            entry => match next {
                Next::End => None,
                Next::Node(id) => Some(id),
                Next::Continue => match entry {
                    Some(NextEntry::Unconditional(id)) => Some(id.clone()),
                    _ => None,
                },
            },
        }
    }

    /// Runs the graph from START until END (or a node returns `Next::End`).
    ///
    /// Errors from any node abort the run; no partial state is returned.
    pub async fn invoke(&self, state: S) -> Result<S, AgentError> {
        log_graph_start();
        let mut state = state;
        let mut current_id = self.first_node_id.clone();
        let mut steps = 0usize;

        loop {
            if let Some(limit) = self.recursion_limit {
                if steps >= limit {
                    let err = AgentError::RecursionLimit(limit);
                    log_graph_error(&err);
                    return Err(err);
                }
            }
            let node = match self.nodes.get(&current_id) {
                Some(node) => node.clone(),
                None => {
                    let err = AgentError::ExecutionFailed(format!("unknown node: {}", current_id));
                    log_graph_error(&err);
                    return Err(err);
                }
            };

            log_node_start(&current_id);
            log_node_state(&current_id, &state);
            let (update, next) = match self.run_node(node, state.clone()).await {
                Ok(output) => output,
                Err(e) => {
                    log_graph_error(&e);
                    return Err(e);
                }
            };
            steps += 1;
            log_node_complete(&current_id, &next);

            self.state_updater.apply_update(&mut state, &update);
            log_state_update(&current_id);

            match self.resolve_next(&current_id, &state, next) {
                Some(id) if id != END => current_id = id,
                _ => {
                    log_graph_complete(steps);
                    return Ok(state);
                }
            }
        }
    }
}
