//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub build: String,
    /// Catalog size; `None` when the store could not be queried
    pub movies: Option<u64>,
}

/// GET /health
///
/// Reports "degraded" instead of failing when the store is unreachable.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let movies = match state.catalog.count().await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!("Health check could not count movies: {}", e);
            None
        }
    };

    Json(HealthResponse {
        status: if movies.is_some() { "ok" } else { "degraded" }.to_string(),
        module: "reelbase-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: env!("GIT_HASH").to_string(),
        movies,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
