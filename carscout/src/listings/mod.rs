//! Listings client: one authenticated GET against an auto.dev-style listings endpoint.
//!
//! The success body is passed through untouched; every failure (missing token,
//! transport, non-2xx) becomes a [`ListingsError`] record so the caller never sees
//! a panic or a bare `Err`. No retries happen at this layer.

mod result;

pub use result::{ListingsError, ListingsResult};

use std::time::Duration;

use tracing::{debug, warn};

use crate::state::SearchRequest;

/// Default listings endpoint.
pub const DEFAULT_LISTINGS_URL: &str = "https://api.auto.dev/listings";
/// Default bound on one listings call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
/// Env var holding the bearer token; named in the missing-token error.
pub const API_KEY_ENV: &str = "AUTO_DEV_API_KEY";

/// Characters of an error body echoed back in `HTTP Status Error` details.
const ERROR_BODY_PREVIEW: usize = 100;

/// Where and how to reach the listings service.
#[derive(Clone, Debug)]
pub struct ListingsConfig {
    pub base_url: String,
    /// Bearer token; `None` makes every call fail with a `Request Error` record.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LISTINGS_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl From<&env_config::AppConfig> for ListingsConfig {
    fn from(config: &env_config::AppConfig) -> Self {
        Self {
            base_url: config.listings_base_url.clone(),
            api_key: config.listings_api_key.clone(),
            timeout: config.listings_timeout,
        }
    }
}

/// Shared listings client. The inner `reqwest::Client` pools connections and is
/// safe to use from concurrent invocations.
#[derive(Clone, Debug)]
pub struct ListingsClient {
    http: reqwest::Client,
    config: ListingsConfig,
}

impl ListingsClient {
    pub fn new(config: ListingsConfig) -> Result<Self, reqwest::Error> {
        if config.api_key.is_none() {
            warn!("{} is not set; listings calls will return an error record", API_KEY_ENV);
        }
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Fetches listings for `request`.
    pub async fn fetch(&self, request: &SearchRequest) -> ListingsResult {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return ListingsResult::Failure(ListingsError::request(format!(
                "{} is not set; cannot authenticate to the listings service",
                API_KEY_ENV
            )));
        };

        let year = request.year.to_string();
        let radius = request.distance.to_string();
        let query = [
            ("make", request.make.as_str()),
            ("model", request.model.as_str()),
            ("year", year.as_str()),
            ("zipCode", request.zip_code.as_str()),
            ("radius", radius.as_str()),
            ("newAndUsed", "new"),
        ];
        debug!(url = %self.config.base_url, ?query, "listings request");

        let response = match self
            .http
            .get(&self.config.base_url)
            .bearer_auth(api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .query(&query)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, timeout = e.is_timeout(), "listings request failed");
                return ListingsResult::Failure(ListingsError::request(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "listings service returned an error status");
            return ListingsResult::Failure(ListingsError::http_status(
                status.as_u16(),
                format!(
                    "Failed to fetch data: {}...",
                    body.chars().take(ERROR_BODY_PREVIEW).collect::<String>()
                ),
            ));
        }

        match response.text().await {
            Ok(body) => {
                debug!(bytes = body.len(), "listings response");
                ListingsResult::Success(body)
            }
            Err(e) => ListingsResult::Failure(ListingsError::unexpected(e.to_string())),
        }
    }
}
