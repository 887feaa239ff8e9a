//! Integration tests for the filmography sources
//!
//! The HTTP source is exercised against a throwaway axum server bound to an
//! ephemeral port.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use reelbase_api::db::{self, SqliteCatalog};
use reelbase_api::source::{FileFilmographySource, FilmographySource, HttpFilmographySource};
use reelbase_api::CatalogStore;
use reelbase_common::Error;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

fn provider_payload() -> Value {
    json!([
        {"id": "tt0070608", "title": "Training Day", "metascore": 69, "year": 2001,
         "link": "https://www.imdb.com/title/tt0070608", "synopsis": "A rookie cop..."},
        {"id": "tt0765429", "title": "American Gangster", "metascore": "76", "year": 2007},
        {"id": "bogus", "title": "Dropped"}
    ])
}

/// Serve a fake provider and return its base URL
async fn spawn_provider() -> String {
    let app = Router::new()
        .route(
            "/filmography/:subject",
            get(|Path(subject): Path<String>| async move {
                if subject == "nm0000243" {
                    Ok(Json(provider_payload()))
                } else {
                    Err(StatusCode::NOT_FOUND)
                }
            }),
        )
        .route(
            "/slow/:subject",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!([]))
            }),
        )
        .route("/garbled/:subject", get(|| async { "<html>not json</html>" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_http_source_fetches_and_normalizes() {
    let base = spawn_provider().await;
    let source =
        HttpFilmographySource::new(format!("{}/filmography/", base), Duration::from_secs(5))
            .unwrap();

    let movies = source.fetch_filmography("nm0000243").await.unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].link, "https://www.imdb.com/title/tt0070608");
    assert_eq!(movies[1].metascore, Some(76));
}

#[tokio::test]
async fn test_http_source_error_status() {
    let base = spawn_provider().await;
    let source =
        HttpFilmographySource::new(format!("{}/filmography", base), Duration::from_secs(5))
            .unwrap();

    let err = source.fetch_filmography("nm9999999").await.unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable(ref msg) if msg.contains("404")));
}

#[tokio::test]
async fn test_http_source_timeout() {
    let base = spawn_provider().await;
    let source =
        HttpFilmographySource::new(format!("{}/slow", base), Duration::from_millis(200)).unwrap();

    let err = source.fetch_filmography("nm0000243").await.unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable(_)));
}

#[tokio::test]
async fn test_http_source_bad_payload() {
    let base = spawn_provider().await;
    let source =
        HttpFilmographySource::new(format!("{}/garbled", base), Duration::from_secs(5)).unwrap();

    let err = source.fetch_filmography("nm0000243").await.unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable(ref msg) if msg.contains("payload")));
}

#[tokio::test]
async fn test_http_source_unreachable() {
    // Bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source =
        HttpFilmographySource::new(format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    let err = source.fetch_filmography("nm0000243").await.unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable(_)));
}

#[tokio::test]
async fn test_file_source() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(provider_payload().to_string().as_bytes())
        .unwrap();

    let source = FileFilmographySource::new(file.path().to_path_buf());
    let movies = source.fetch_filmography("nm0000243").await.unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].title, "Training Day");
}

#[tokio::test]
async fn test_file_source_missing_file() {
    let source = FileFilmographySource::new("/nonexistent/filmography.json".into());
    let err = source.fetch_filmography("nm0000243").await.unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable(_)));
}

#[tokio::test]
async fn test_populate_from_http_source() {
    let base = spawn_provider().await;
    let source =
        HttpFilmographySource::new(format!("{}/filmography", base), Duration::from_secs(5))
            .unwrap();

    let pool = db::connect("sqlite::memory:").await.unwrap();
    let catalog = SqliteCatalog::new(pool, Arc::new(source), "nm0000243");

    let summary = catalog.populate().await.unwrap();
    assert_eq!(summary.inserted_count, 2);

    let movie = catalog.find_by_id("tt0765429").await.unwrap().unwrap();
    assert_eq!(movie.title, "American Gangster");
}
