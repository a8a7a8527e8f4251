//! StateGraph invoke: routing, state merging, middleware and the recursion limit.


use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use carscout::{
    AgentError, FieldBasedUpdater, LoggingNodeMiddleware, Next, Node, StateGraph, END, START,
};

#[derive(Clone, Debug, Default, PartialEq)]
struct Trail {
    visited: Vec<String>,
}

/// Records its id; returns a delta holding only that id.
struct Visit {
    id: &'static str,
    next: Next,
}

impl Visit {
    fn new(id: &'static str) -> Arc<Self> {
        Arc::new(Self {
            id,
            next: Next::Continue,
        })
    }
}

#[async_trait]
impl Node<Trail> for Visit {
    fn id(&self) -> &str {
        self.id
    }

    async fn run(&self, _state: Trail) -> Result<(Trail, Next), AgentError> {
        Ok((
            Trail {
                visited: vec![self.id.to_string()],
            },
            self.next.clone(),
        ))
    }
}

fn append_trail() -> Arc<FieldBasedUpdater<Trail, impl Fn(&mut Trail, &Trail) + Send + Sync>> {
    Arc::new(FieldBasedUpdater::new(|cur: &mut Trail, upd: &Trail| {
        cur.visited.extend(upd.visited.iter().cloned());
    }))
}

/// **Scenario**: A linear chain runs each node once, in order, and appends updates.
#[tokio::test]
async fn invoke_linear_chain_appends() {
    let mut graph = StateGraph::<Trail>::new();
    graph
        .add_node("a", Visit::new("a"))
        .add_node("b", Visit::new("b"))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let compiled = graph.with_state_updater(append_trail()).compile().unwrap();

    let out = compiled.invoke(Trail::default()).await.unwrap();
    assert_eq!(out.visited, ["a", "b"]);
}

/// **Scenario**: Without an updater the last node's output replaces the state.
#[tokio::test]
async fn invoke_default_updater_replaces() {
    let mut graph = StateGraph::<Trail>::new();
    graph
        .add_node("a", Visit::new("a"))
        .add_node("b", Visit::new("b"))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let out = graph.compile().unwrap().invoke(Trail::default()).await.unwrap();
    assert_eq!(out.visited, ["b"]);
}

/// **Scenario**: A conditional loop runs until the router returns END.
#[tokio::test]
async fn invoke_conditional_loop_until_end() {
    let mut graph = StateGraph::<Trail>::new();
    graph
        .add_node("think", Visit::new("think"))
        .add_node("act", Visit::new("act"))
        .add_edge(START, "think")
        .add_edge("act", "think");
    let path_map: HashMap<String, String> = [
        ("act".to_string(), "act".to_string()),
        (END.to_string(), END.to_string()),
    ]
    .into_iter()
    .collect();
    graph.add_conditional_edges(
        "think",
        Arc::new(|s: &Trail| {
            if s.visited.iter().filter(|v| *v == "act").count() < 2 {
                "act".to_string()
            } else {
                END.to_string()
            }
        }),
        Some(path_map),
    );
    let compiled = graph.with_state_updater(append_trail()).compile().unwrap();

    let out = compiled.invoke(Trail::default()).await.unwrap();
    assert_eq!(out.visited, ["think", "act", "think", "act", "think"]);
}

/// **Scenario**: A router that never ends trips the recursion limit instead of looping forever.
#[tokio::test]
async fn invoke_stops_at_recursion_limit() {
    let mut graph = StateGraph::<Trail>::new();
    graph
        .add_node("think", Visit::new("think"))
        .add_node("act", Visit::new("act"))
        .add_edge(START, "think")
        .add_edge("act", "think")
        .add_conditional_edges(
            "think",
            Arc::new(|_: &Trail| "act".to_string()),
            Some(
                [
                    ("act".to_string(), "act".to_string()),
                    (END.to_string(), END.to_string()),
                ]
                .into_iter()
                .collect(),
            ),
        );
    let compiled = graph.with_recursion_limit(Some(5)).compile().unwrap();

    match compiled.invoke(Trail::default()).await {
        Err(AgentError::RecursionLimit(5)) => {}
        other => panic!("expected RecursionLimit(5), got {:?}", other),
    }
}

/// **Scenario**: A node returning Next::End stops the run even if an edge follows.
#[tokio::test]
async fn invoke_node_end_short_circuits() {
    let mut graph = StateGraph::<Trail>::new();
    graph
        .add_node(
            "a",
            Arc::new(Visit {
                id: "a",
                next: Next::End,
            }),
        )
        .add_node("b", Visit::new("b"))
        .add_edge(START, "a")
        .add_edge("a", "b")
        .add_edge("b", END);
    let compiled = graph.with_state_updater(append_trail()).compile().unwrap();
    let out = compiled.invoke(Trail::default()).await.unwrap();
    assert_eq!(out.visited, ["a"]);
}

struct Failing {
    runs: AtomicUsize,
}

#[async_trait]
impl Node<Trail> for Failing {
    fn id(&self) -> &str {
        "fail"
    }

    async fn run(&self, _state: Trail) -> Result<(Trail, Next), AgentError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Err(AgentError::ExecutionFailed("node broke".into()))
    }
}

/// **Scenario**: A node error aborts the run through the logging middleware unchanged.
#[tokio::test]
async fn invoke_propagates_node_error_through_middleware() {
    let failing = Arc::new(Failing {
        runs: AtomicUsize::new(0),
    });
    let mut graph = StateGraph::<Trail>::new();
    graph
        .add_node("fail", failing.clone())
        .add_edge(START, "fail")
        .add_edge("fail", END);
    let compiled = graph
        .with_middleware(Arc::new(LoggingNodeMiddleware::default()))
        .compile()
        .unwrap();

    let err = compiled.invoke(Trail::default()).await.unwrap_err();
    assert!(err.to_string().contains("node broke"), "{}", err);
    assert_eq!(failing.runs.load(Ordering::SeqCst), 1);
}
