//! Axum app: shared state and router.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use carscout::SearchAgent;
use serde_json::{json, Value};

use crate::search::search_handler;

/// Shared state for the HTTP server; the compiled agent is reused by every request.
#[derive(Clone)]
pub struct AppState {
    pub(crate) agent: Arc<SearchAgent>,
}

impl AppState {
    pub fn new(agent: SearchAgent) -> Self {
        Self {
            agent: Arc::new(agent),
        }
    }
}

/// Builds the router: `POST /search`, `GET /health`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", post(search_handler))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
