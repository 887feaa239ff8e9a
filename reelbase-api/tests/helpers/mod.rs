//! Shared helpers for reelbase-api integration tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use reelbase_api::db::{self, SqliteCatalog};
use reelbase_api::source::FilmographySource;
use reelbase_api::{build_router, AppState, CatalogStore, GatewaySettings, PopulateSummary};
use reelbase_common::{Error, MovieRecord, Result, Review};
use serde_json::Value;

pub const SETTINGS: GatewaySettings = GatewaySettings {
    metascore_threshold: 70,
    max_search_limit: 3,
};

/// Source returning a fixed filmography
pub struct StaticSource(pub Vec<MovieRecord>);

#[async_trait]
impl FilmographySource for StaticSource {
    fn describe(&self) -> String {
        "static".to_string()
    }

    async fn fetch_filmography(&self, _subject_id: &str) -> Result<Vec<MovieRecord>> {
        Ok(self.0.clone())
    }
}

/// Catalog whose every operation fails, for error-path tests
pub struct FailingCatalog;

#[async_trait]
impl CatalogStore for FailingCatalog {
    async fn populate(&self) -> Result<PopulateSummary> {
        Err(Error::SourceUnavailable("provider offline".into()))
    }

    async fn random_above_threshold(&self, _threshold: i64) -> Result<Option<MovieRecord>> {
        Err(Error::Internal("store offline".into()))
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<MovieRecord>> {
        Err(Error::Internal("store offline".into()))
    }

    async fn search(&self, _min_metascore: i64, _limit: i64) -> Result<Vec<MovieRecord>> {
        Err(Error::Internal("store offline".into()))
    }

    async fn append_review(&self, _id: &str, _review: Review) -> Result<MovieRecord> {
        Err(Error::Persistence("write rejected".into()))
    }

    async fn count(&self) -> Result<u64> {
        Err(Error::Internal("store offline".into()))
    }
}

pub fn filmography() -> Vec<MovieRecord> {
    vec![
        MovieRecord::new("tt0070608", "Training Day")
            .with_metascore(69)
            .with_year(2001),
        MovieRecord::new("tt0765429", "American Gangster")
            .with_metascore(76)
            .with_year(2007),
        MovieRecord::new("tt0099810", "Glory")
            .with_metascore(78)
            .with_year(1989),
        MovieRecord::new("tt0115956", "Courage Under Fire").with_year(1996),
        MovieRecord::new("tt0133093", "The Bone Collector")
            .with_metascore(45)
            .with_year(1999),
        MovieRecord::new("tt0455944", "The Equalizer")
            .with_metascore(57)
            .with_year(2014),
    ]
}

/// In-memory catalog over the given source
pub async fn sqlite_catalog(movies: Vec<MovieRecord>) -> Arc<SqliteCatalog> {
    let pool = db::connect("sqlite::memory:")
        .await
        .expect("Should connect to in-memory database");
    Arc::new(SqliteCatalog::new(
        pool,
        Arc::new(StaticSource(movies)),
        "nm0000243",
    ))
}

/// Router plus the catalog behind it, not yet populated
pub async fn setup_app(movies: Vec<MovieRecord>) -> (Router, Arc<SqliteCatalog>) {
    let catalog = sqlite_catalog(movies).await;
    let state = AppState::new(catalog.clone(), SETTINGS);
    (build_router(state), catalog)
}

/// Router over a catalog already populated with [`filmography`]
pub async fn populated_app() -> (Router, Arc<SqliteCatalog>) {
    let (app, catalog) = setup_app(filmography()).await;
    catalog.populate().await.expect("Populate should succeed");
    (app, catalog)
}

pub fn failing_app() -> Router {
    build_router(AppState::new(Arc::new(FailingCatalog), SETTINGS))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_raw(uri: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("Should read body")
        .to_bytes()
        .to_vec()
}

pub async fn extract_json(response: Response<Body>) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
