//! ToolDispatchNode: order preservation, id correlation and error feedback.


use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use carscout::{
    ConversationState, Message, Next, Node, SearchRequest, ToolCall, ToolCallContent,
    ToolDispatchNode, ToolSource, ToolSourceError, ToolSpec,
};
use serde_json::{Map, Value};

/// Sleeps `delay_ms` from the args (later calls finish first), then echoes `tag`.
struct SlowEcho;

#[async_trait]
impl ToolSource for SlowEcho {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(vec![])
    }

    async fn call_tool(
        &self,
        name: &str,
        args: Map<String, Value>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        if name != "echo" {
            return Err(ToolSourceError::NotFound(name.to_string()));
        }
        let delay = args.get("delay_ms").and_then(Value::as_u64).unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        let tag = args
            .get("tag")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolSourceError::InvalidInput("tag missing".into()))?;
        Ok(ToolCallContent {
            text: tag.to_string(),
        })
    }
}

fn call(id: &str, name: &str, tag: &str, delay_ms: u64) -> ToolCall {
    let mut args = Map::new();
    args.insert("tag".into(), Value::from(tag));
    args.insert("delay_ms".into(), Value::from(delay_ms));
    ToolCall::new(id, name, args)
}

fn state_with_calls(calls: Vec<ToolCall>) -> ConversationState {
    let mut state = ConversationState::new(SearchRequest::new("Toyota", "Camry", 2025, "75080"));
    state.messages.push(Message::user("find"));
    state.messages.push(Message::assistant_with_tool_calls("", calls));
    state
}

/// **Scenario**: k calls produce k tool messages in call order with matching ids,
/// even when later calls finish first.
#[tokio::test]
async fn dispatch_preserves_call_order() {
    let calls = vec![
        call("c1", "echo", "first", 60),
        call("c2", "echo", "second", 30),
        call("c3", "echo", "third", 0),
    ];
    let node = ToolDispatchNode::new(Arc::new(SlowEcho));
    let (delta, next) = node.run(state_with_calls(calls.clone())).await.unwrap();

    assert_eq!(next, Next::Continue);
    assert_eq!(delta.messages.len(), calls.len());
    for (msg, call) in delta.messages.iter().zip(&calls) {
        match msg {
            Message::Tool {
                tool_call_id,
                name,
                ..
            } => {
                assert_eq!(tool_call_id, &call.id);
                assert_eq!(name, &call.name);
            }
            other => panic!("expected tool message, got {:?}", other),
        }
    }
    let contents: Vec<_> = delta.messages.iter().map(Message::content).collect();
    assert_eq!(contents, ["first", "second", "third"]);
}

/// **Scenario**: Unknown tools and bad arguments are appended as error records, not dropped.
#[tokio::test]
async fn dispatch_feeds_errors_back_as_content() {
    let mut bad_args = call("c2", "echo", "x", 0);
    bad_args.args.remove("tag");
    let calls = vec![call("c1", "lookup_vin", "x", 0), bad_args];
    let node = ToolDispatchNode::new(Arc::new(SlowEcho));
    let (delta, _) = node.run(state_with_calls(calls)).await.unwrap();

    assert_eq!(delta.messages.len(), 2);
    let first: Value = serde_json::from_str(delta.messages[0].content()).unwrap();
    assert_eq!(first["error"], "Tool Not Found");
    let second: Value = serde_json::from_str(delta.messages[1].content()).unwrap();
    assert_eq!(second["error"], "Invalid Arguments");
}

/// **Scenario**: Reaching the node without pending tool calls is an execution error.
#[tokio::test]
async fn dispatch_without_tool_calls_is_an_error() {
    let mut state = ConversationState::new(SearchRequest::new("a", "b", 2020, "12345"));
    state.messages.push(Message::assistant("no tools"));
    let node = ToolDispatchNode::new(Arc::new(SlowEcho));
    assert!(node.run(state).await.is_err());
}
