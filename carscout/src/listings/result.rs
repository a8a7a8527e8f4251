//! Listings call outcome: raw success body or a structured error record.

use serde::{Deserialize, Serialize};

/// Structured failure handed to the model as tool content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingsError {
    /// Category: `Request Error`, `HTTP Status Error` or `Unexpected Error`.
    pub error: String,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ListingsError {
    pub const REQUEST: &'static str = "Request Error";
    pub const HTTP_STATUS: &'static str = "HTTP Status Error";
    pub const UNEXPECTED: &'static str = "Unexpected Error";

    /// Transport failure: DNS, connect, timeout, or missing credentials.
    pub fn request(details: impl Into<String>) -> Self {
        Self {
            error: Self::REQUEST.to_string(),
            details: details.into(),
            status_code: None,
        }
    }

    pub fn http_status(status_code: u16, details: impl Into<String>) -> Self {
        Self {
            error: Self::HTTP_STATUS.to_string(),
            details: details.into(),
            status_code: Some(status_code),
        }
    }

    /// The service answered 2xx but the body could not be read.
    pub fn unexpected(details: impl Into<String>) -> Self {
        Self {
            error: Self::UNEXPECTED.to_string(),
            details: details.into(),
            status_code: None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            serde_json::json!({ "error": self.error, "details": self.details }).to_string()
        })
    }
}

/// Outcome of one listings call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListingsResult {
    /// Response body verbatim (JSON owned by the listings provider).
    Success(String),
    Failure(ListingsError),
}

impl ListingsResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Text handed to the model: the body, or the error record as JSON.
    pub fn into_content(self) -> String {
        match self {
            Self::Success(body) => body,
            Self::Failure(err) => err.to_json(),
        }
    }
}
