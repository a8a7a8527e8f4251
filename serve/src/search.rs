//! `POST /search`: runs one search and returns the summary and full conversation.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use carscout::SearchRequest;
use tracing::{info, warn};

use crate::app::AppState;
use crate::response::{error_response, error_with_status, SearchResponse};

/// Blank make, model or zip code is rejected before any model call.
fn validate(request: &SearchRequest) -> Result<(), String> {
    for (field, value) in [
        ("make", &request.make),
        ("model", &request.model),
        ("zip_code", &request.zip_code),
    ] {
        if value.trim().is_empty() {
            return Err(format!("{} must not be empty", field));
        }
    }
    Ok(())
}

pub(crate) async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Response {
    if let Err(e) = validate(&request) {
        return error_with_status(StatusCode::BAD_REQUEST, e);
    }
    info!(make = %request.make, model = %request.model, "search request");
    match state.agent.run(request).await {
        Ok(conversation) => Json(SearchResponse {
            summary: conversation.summary(),
            messages: conversation.messages,
        })
        .into_response(),
        Err(e) => {
            warn!(error = %e, "search failed");
            error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_blank_fields() {
        let ok = SearchRequest::new("Toyota", "Camry", 2025, "75080");
        assert!(validate(&ok).is_ok());
        let blank = SearchRequest::new("Toyota", " ", 2025, "75080");
        assert_eq!(validate(&blank).unwrap_err(), "model must not be empty");
    }
}
