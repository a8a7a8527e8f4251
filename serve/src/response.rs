//! Response bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use carscout::{AgentError, Message, RunError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Content of the last assistant message, if the run produced one.
    pub summary: Option<String>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Maps a failed run to a status code: model-side failures are 502, the rest 500.
pub(crate) fn error_response(err: &RunError) -> Response {
    let status = match err {
        RunError::Execution(AgentError::ModelExhausted { .. })
        | RunError::Execution(AgentError::ExecutionFailed(_)) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_with_status(status, err.to_string())
}

pub(crate) fn error_with_status(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}
