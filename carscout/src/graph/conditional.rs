//! Conditional edges: route to the next node based on state.
//!
//! A source node has a routing function `(state) -> key`. The key is the next node id,
//! or is looked up in an optional path map first.

use std::collections::HashMap;
use std::sync::Arc;

/// Router function: reads the merged state and returns a routing key.
pub type ConditionalRouterFn<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// Routing function plus optional key → node id map.
#[derive(Clone)]
pub struct ConditionalRouter<S> {
    pub(super) path: ConditionalRouterFn<S>,
    pub(super) path_map: Option<HashMap<String, String>>,
}

impl<S> ConditionalRouter<S> {
    pub fn new(path: ConditionalRouterFn<S>, path_map: Option<HashMap<String, String>>) -> Self {
        Self { path, path_map }
    }

    /// Next node id (or END); a key missing from the path map is used as-is.
    pub fn resolve_next(&self, state: &S) -> String {
        let key = (self.path)(state);
        self.path_map
            .as_ref()
            .and_then(|m| m.get(&key))
            .cloned()
            .unwrap_or(key)
    }
}

/// How the compiled graph finds the successor of a node.
#[derive(Clone)]
pub enum NextEntry<S> {
    /// Single fixed successor (or END). The node's own `Next` is still respected.
    Unconditional(String),
    /// Successor decided by the router from state; the node's `Next` is ignored.
    Conditional(ConditionalRouter<S>),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Without a path map the router key is the node id.
    #[test]
    fn resolve_without_path_map_uses_key() {
        let r = ConditionalRouter::<u8>::new(Arc::new(|n| format!("n{}", n)), None);
        assert_eq!(r.resolve_next(&3), "n3");
    }

    /// **Scenario**: With a path map, known keys are mapped and unknown keys pass through.
    #[test]
    fn resolve_with_path_map() {
        let map: HashMap<String, String> = [("tools".to_string(), "act".to_string())]
            .into_iter()
            .collect();
        let r = ConditionalRouter::<bool>::new(
            Arc::new(|b| if *b { "tools".into() } else { "other".into() }),
            Some(map),
        );
        assert_eq!(r.resolve_next(&true), "act");
        assert_eq!(r.resolve_next(&false), "other");
    }
}
