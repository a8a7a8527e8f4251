//! End-to-end search runs: scripted model, mocked listings API, real graph.


use std::sync::Arc;
use std::time::Duration;

use carscout::{
    default_registry, search_call, AgentError, ListingsClient, ListingsConfig, LlmClient,
    LlmResponse, Message, MockLlm, RunError, SearchAgent, SearchRequest, ToolCall, ToolRegistry,
    MAX_LLM_RETRIES,
};
use serde_json::{Map, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CAMRY_BODY: &str = r#"{"data":[{"vehicle":{"year":2025,"make":"Toyota","model":"Camry"},"retailListing":{"price":24999}}]}"#;
const SUMMARY: &str = "Found one listing: a 2025 Toyota Camry for $24,999 near 75080.";

fn camry() -> SearchRequest {
    SearchRequest::new("Toyota", "Camry", 2025, "75080").with_distance(10)
}

async fn listings_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/listings"))
        .and(query_param("radius", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CAMRY_BODY))
        .mount(&server)
        .await;
    server
}

fn registry(server: &MockServer) -> Arc<ToolRegistry> {
    let client = ListingsClient::new(ListingsConfig {
        base_url: format!("{}/listings", server.uri()),
        api_key: Some("test-key".into()),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    Arc::new(default_registry(client))
}

fn agent(llm: Arc<MockLlm>, tools: Arc<ToolRegistry>) -> SearchAgent {
    let llm: Arc<dyn LlmClient> = llm;
    SearchAgent::builder(llm, tools).build().unwrap()
}

/// **Scenario**: Toyota Camry 2025 near 75080 within 10 miles: the model calls the tool once,
/// the listing body is fed back verbatim, and the final message is the summary.
#[tokio::test]
async fn camry_search_end_to_end() {
    let server = listings_server().await;
    let llm = Arc::new(MockLlm::listing_search_then(&camry(), SUMMARY));
    let state = agent(llm.clone(), registry(&server)).run(camry()).await.unwrap();

    // [user prompt, assistant(tool call), tool result, assistant(summary)]
    assert_eq!(state.messages.len(), 4);
    assert_eq!(state.messages[0].role(), "user");
    assert!(state.messages[0].content().contains("2025 Toyota Camry"));
    assert!(state.messages[0].content().contains("75080"));

    let calls = state.messages[1].tool_calls();
    assert_eq!(state.messages[1].role(), "assistant");
    assert_eq!(calls.len(), 1);
    match &state.messages[2] {
        Message::Tool {
            tool_call_id,
            content,
            ..
        } => {
            assert_eq!(tool_call_id, &calls[0].id);
            assert_eq!(content, CAMRY_BODY);
        }
        other => panic!("expected tool message, got {:?}", other),
    }

    let summary = state.summary().unwrap();
    for needle in ["Toyota", "Camry", "$24,999"] {
        assert!(summary.contains(needle), "summary missing {}", needle);
    }
    assert_eq!(llm.call_count(), 2);
}

/// **Scenario**: The first call uses the small token cap and the summary call the large one;
/// both start with the system message and the second sees the tool result.
#[tokio::test]
async fn model_calls_use_phase_budgets() {
    let server = listings_server().await;
    let llm = Arc::new(MockLlm::listing_search_then(&camry(), SUMMARY));
    agent(llm.clone(), registry(&server)).run(camry()).await.unwrap();

    let calls = llm.calls();
    assert_eq!(calls[0].options.max_completion_tokens, Some(32));
    assert_eq!(calls[1].options.max_completion_tokens, Some(4000));
    assert!(calls.iter().all(|c| c.messages[0].role() == "system"));
    assert_eq!(calls[1].messages.last().map(Message::role), Some("tool"));
}

/// **Scenario**: A reply without tool calls ends the run immediately.
#[tokio::test]
async fn direct_answer_ends_without_tools() {
    let server = MockServer::start().await;
    let llm = Arc::new(MockLlm::scripted(vec![LlmResponse::text("No search needed.")]));
    let state = agent(llm.clone(), registry(&server)).run(camry()).await.unwrap();

    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.summary().as_deref(), Some("No search needed."));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

/// **Scenario**: Two empty replies are retried and the third one is used.
#[tokio::test]
async fn empty_replies_are_retried() {
    let server = listings_server().await;
    let llm = Arc::new(MockLlm::scripted(vec![
        LlmResponse::text(""),
        LlmResponse::default(),
        LlmResponse::with_tool_calls(vec![search_call("call-1", &camry())]),
        LlmResponse::text(SUMMARY),
    ]));
    let state = agent(llm.clone(), registry(&server)).run(camry()).await.unwrap();

    assert_eq!(llm.call_count(), 4);
    assert_eq!(state.summary().as_deref(), Some(SUMMARY));
}

/// **Scenario**: Three empty replies in a row abort the run with ModelExhausted.
#[tokio::test]
async fn exhausted_retries_fail_the_run() {
    let server = MockServer::start().await;
    let llm = Arc::new(MockLlm::scripted(vec![LlmResponse::default(); MAX_LLM_RETRIES]));
    let err = agent(llm.clone(), registry(&server))
        .run(camry())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RunError::Execution(AgentError::ModelExhausted { attempts }) if attempts == MAX_LLM_RETRIES
    ));
    assert_eq!(llm.call_count(), MAX_LLM_RETRIES);
}

/// **Scenario**: A listings API failure is fed back to the model as an error record
/// and the model still produces a summary.
#[tokio::test]
async fn listings_failure_is_reported_to_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    let llm = Arc::new(MockLlm::listing_search_then(&camry(), "The listings service failed."));
    let state = agent(llm, registry(&server)).run(camry()).await.unwrap();

    let record: Value = serde_json::from_str(state.messages[2].content()).unwrap();
    assert_eq!(record["error"], "HTTP Status Error");
    assert_eq!(record["status_code"], 500);
    assert_eq!(state.summary().as_deref(), Some("The listings service failed."));
}

/// **Scenario**: An unknown tool name yields an error tool message, not a crash.
#[tokio::test]
async fn unknown_tool_becomes_error_content() {
    let server = MockServer::start().await;
    let llm = Arc::new(MockLlm::scripted(vec![
        LlmResponse::with_tool_calls(vec![ToolCall::new("call-x", "lookup_vin", Map::new())]),
        LlmResponse::text("That tool is unavailable."),
    ]));
    let state = agent(llm, registry(&server)).run(camry()).await.unwrap();

    let record: Value = serde_json::from_str(state.messages[2].content()).unwrap();
    assert_eq!(record["error"], "Tool Not Found");
}

/// **Scenario**: A model that keeps calling tools is stopped by the step limit.
#[tokio::test]
async fn endless_tool_loop_hits_recursion_limit() {
    let server = listings_server().await;
    let script = (0..10)
        .map(|i| LlmResponse::with_tool_calls(vec![search_call(&format!("call-{}", i), &camry())]))
        .collect();
    let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::scripted(script));
    let agent = SearchAgent::builder(llm, registry(&server))
        .recursion_limit(Some(5))
        .build()
        .unwrap();

    let err = agent.run(camry()).await.unwrap_err();
    assert!(matches!(err, RunError::Execution(AgentError::RecursionLimit(5))));
}

/// **Scenario**: Building against a registry without the listings tool fails fast.
#[tokio::test]
async fn missing_required_tool_fails_build() {
    let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::scripted(vec![]));
    let result = SearchAgent::builder(llm, Arc::new(ToolRegistry::new())).build();
    assert!(matches!(result, Err(RunError::Tools(_))));
}
