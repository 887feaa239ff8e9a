//! reelbase-api library
//!
//! Film catalog service exposing the same catalog operations over REST and
//! GraphQL. The store handle is built once in `main` and injected through
//! [`AppState`].

use std::sync::Arc;

use axum::Router;
use reelbase_common::config::ServiceConfig;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog;
pub mod db;
pub mod error;
pub mod source;

pub use crate::catalog::{CatalogStore, PopulateSummary};
pub use crate::error::{ApiError, ApiResult};

use crate::api::graphql::{build_schema, CatalogSchema};

/// Gateway-level settings shared by REST and GraphQL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewaySettings {
    /// Metascore a movie must exceed to be served as a random must-watch
    pub metascore_threshold: i64,
    /// Upper bound on search limits
    pub max_search_limit: i64,
}

impl GatewaySettings {
    /// Cap a requested search limit; non-positive values pass through
    pub fn cap_limit(&self, limit: i64) -> i64 {
        limit.min(self.max_search_limit)
    }
}

impl From<&ServiceConfig> for GatewaySettings {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            metascore_threshold: config.metascore_threshold,
            max_search_limit: config.max_search_limit,
        }
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub settings: GatewaySettings,
    pub schema: CatalogSchema,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogStore>, settings: GatewaySettings) -> Self {
        let schema = build_schema(catalog.clone(), settings);
        Self {
            catalog,
            settings,
            schema,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/movies", get(api::random_movie))
        .route("/movies/populate", get(api::populate_movies))
        .route("/movies/search", get(api::search_movies))
        .route(
            "/movies/:id",
            get(api::specific_movie).post(api::review_movie),
        )
        .route(
            "/graphql",
            get(api::graphiql).post(api::graphql_handler),
        )
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
