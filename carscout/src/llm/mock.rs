//! Mock LLM for tests: replays a script of replies and records every call.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::AgentError;
use crate::llm::{InvokeOptions, LlmClient, LlmResponse};
use crate::message::{Message, ToolCall};
use crate::state::SearchRequest;
use crate::tools::SEARCH_LISTINGS_TOOL;

/// One recorded `invoke` call.
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub options: InvokeOptions,
}

/// Scripted mock: the n-th `invoke` returns the n-th scripted entry.
///
/// Running past the end of the script is an execution error, so tests notice
/// unexpected extra model calls.
pub struct MockLlm {
    script: Vec<Result<LlmResponse, String>>,
    next: AtomicUsize,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLlm {
    /// Mock that replays `responses` in order.
    pub fn scripted(responses: Vec<LlmResponse>) -> Self {
        Self::scripted_results(responses.into_iter().map(Ok).collect())
    }

    /// Like `scripted`, but an `Err(msg)` entry fails that call as a transport error.
    pub fn scripted_results(script: Vec<Result<LlmResponse, String>>) -> Self {
        Self {
            script,
            next: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Two-turn script for one search: a `search_auto_dev` call built from `request`,
    /// then `summary` as the final answer.
    pub fn listing_search_then(request: &SearchRequest, summary: impl Into<String>) -> Self {
        Self::scripted(vec![
            LlmResponse::with_tool_calls(vec![search_call("call-1", request)]),
            LlmResponse::text(summary),
        ])
    }

    /// Number of `invoke` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// Snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// A `search_auto_dev` tool call with arguments taken from `request`.
pub fn search_call(id: &str, request: &SearchRequest) -> ToolCall {
    let mut args = Map::new();
    args.insert("make".into(), Value::from(request.make.clone()));
    args.insert("model".into(), Value::from(request.model.clone()));
    args.insert("year".into(), Value::from(request.year));
    args.insert("zip_code".into(), Value::from(request.zip_code.clone()));
    args.insert("distance".into(), Value::from(request.distance));
    ToolCall::new(id, SEARCH_LISTINGS_TOOL, args)
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(
        &self,
        messages: &[Message],
        options: &InvokeOptions,
    ) -> Result<LlmResponse, AgentError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedCall {
                messages: messages.to_vec(),
                options: options.clone(),
            });
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        match self.script.get(index) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(msg)) => Err(AgentError::ExecutionFailed(msg.clone())),
            None => Err(AgentError::ExecutionFailed(format!(
                "mock llm script exhausted after {} calls",
                self.script.len()
            ))),
        }
    }
}
