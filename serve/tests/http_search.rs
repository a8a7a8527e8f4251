//! Server e2e: bind 127.0.0.1:0, serve a mock-backed agent, drive it over HTTP.

use std::sync::Arc;
use std::time::Duration;

use carscout::{
    default_registry, ListingsClient, ListingsConfig, LlmClient, LlmResponse, MockLlm,
    SearchAgent, SearchRequest,
};
use serde_json::{json, Value};
use serve::{run_serve_on_listener, AppState, ErrorBody, SearchResponse};
use tokio::net::TcpListener;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const BODY: &str = r#"{"data":[{"vehicle":{"year":2025,"make":"Toyota","model":"Camry"},"retailListing":{"price":24999}}]}"#;

fn camry() -> SearchRequest {
    SearchRequest::new("Toyota", "Camry", 2025, "75080").with_distance(10)
}

/// Starts the server with `llm` and a listings client pointed at `listings`; returns the base URL.
async fn start(llm: MockLlm, listings: &MockServer) -> String {
    let client = ListingsClient::new(ListingsConfig {
        base_url: format!("{}/listings", listings.uri()),
        api_key: Some("k".into()),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    let llm: Arc<dyn LlmClient> = Arc::new(llm);
    let agent = SearchAgent::builder(llm, Arc::new(default_registry(client)))
        .build()
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(run_serve_on_listener(listener, AppState::new(agent)));
    format!("http://{}", addr)
}

#[tokio::test]
async fn health_reports_ok() {
    let listings = MockServer::start().await;
    let base = start(MockLlm::scripted(vec![]), &listings).await;
    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

/// **Scenario**: A search returns the summary and the four-message conversation.
#[tokio::test]
async fn search_returns_summary_and_messages() {
    let listings = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BODY))
        .mount(&listings)
        .await;
    let llm = MockLlm::listing_search_then(&camry(), "2025 Toyota Camry, $24,999.");
    let base = start(llm, &listings).await;

    let response = reqwest::Client::new()
        .post(format!("{}/search", base))
        .json(&camry())
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: SearchResponse = response.json().await.unwrap();
    assert_eq!(body.summary.as_deref(), Some("2025 Toyota Camry, $24,999."));
    assert_eq!(body.messages.len(), 4);
    assert_eq!(body.messages[2].content(), BODY);
}

/// **Scenario**: Distance defaults to 25 when the body omits it.
#[tokio::test]
async fn search_body_without_distance_is_accepted() {
    let listings = MockServer::start().await;
    let llm = MockLlm::scripted(vec![LlmResponse::text("done")]);
    let base = start(llm, &listings).await;

    let response = reqwest::Client::new()
        .post(format!("{}/search", base))
        .json(&json!({"make": "Honda", "model": "Civic", "year": 2024, "zip_code": "10001"}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: SearchResponse = response.json().await.unwrap();
    assert!(body.messages[0].content().contains("within 25 miles"));
}

/// **Scenario**: A model that only returns empty replies yields 502 with an error body.
#[tokio::test]
async fn exhausted_model_is_bad_gateway() {
    let listings = MockServer::start().await;
    let llm = MockLlm::scripted(vec![LlmResponse::default(); 3]);
    let base = start(llm, &listings).await;

    let response = reqwest::Client::new()
        .post(format!("{}/search", base))
        .json(&camry())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 502);
    let body: ErrorBody = response.json().await.unwrap();
    assert!(body.error.contains("3 attempts"));
}

#[tokio::test]
async fn blank_make_is_bad_request() {
    let listings = MockServer::start().await;
    let base = start(MockLlm::scripted(vec![]), &listings).await;

    let response = reqwest::Client::new()
        .post(format!("{}/search", base))
        .json(&SearchRequest::new("", "Camry", 2025, "75080"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}
