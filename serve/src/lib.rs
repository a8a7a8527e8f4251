//! HTTP wrapper for the carscout search agent (axum).
//!
//! Listens on http://127.0.0.1:8080 and exposes `POST /search` and `GET /health`.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`AppState`].

mod app;
mod response;
mod search;

use tokio::net::TcpListener;
use tracing::info;

pub use app::{router, AppState};
pub use response::{ErrorBody, SearchResponse};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serves on an existing listener. Used by tests (bind to 127.0.0.1:0 then pass the listener).
pub async fn run_serve_on_listener(listener: TcpListener, state: AppState) -> Result<(), ServeError> {
    let addr = listener.local_addr()?;
    info!("carscout server listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Binds `addr` (default 127.0.0.1:8080) and serves until the process exits.
pub async fn run_serve(addr: Option<&str>, state: AppState) -> Result<(), ServeError> {
    let addr = addr.unwrap_or(DEFAULT_ADDR);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    run_serve_on_listener(listener, state).await
}
