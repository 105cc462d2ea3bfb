//! HTTP server module
//!
//! Exposes the artifact service over HTTP. Artifacts are requested as
//! `GET /<prefix>/<url-encoded-artifact-url>` and streamed back as attachments.

use crate::{ArtifactService, Config, Result};
use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod error_response;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Create the router with all route definitions
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `GET /:prefix/*artifact_url` - Fetch an artifact through the cache.
///   `prefix` must be one of `server.prefixes`; `artifact_url` is the
///   percent-decoded origin URL.
pub fn create_router(service: Arc<ArtifactService>, config: Arc<Config>) -> Router {
    let state = AppState::new(service, config);

    Router::new()
        .route("/health", get(routes::health_check))
        .route("/:prefix/*artifact_url", get(routes::get_artifact))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server on the configured bind address.
///
/// Runs until the listener fails. A bind failure is returned immediately so
/// the caller can abort startup.
///
/// # Example
///
/// ```no_run
/// use artifact_cache::{ArtifactService, Config};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let service = Arc::new(ArtifactService::from_config(&config)?);
///
/// // Blocks until the server stops
/// artifact_cache::api::start_api_server(service, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(service: Arc<ArtifactService>, config: Arc<Config>) -> Result<()> {
    let bind_address = config.server.bind_address;

    tracing::info!(
        address = %bind_address,
        prefixes = ?config.server.prefixes,
        "Starting artifact server"
    );

    let app = create_router(service, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "Artifact server listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("Artifact server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
