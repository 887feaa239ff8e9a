//! Filmography data sources
//!
//! A source turns a subject id (e.g. `nm0000243`) into a normalized list of
//! movie records. Providers are opaque: all that is assumed is a JSON array
//! of movie objects.

mod file;
mod http;

pub use file::FileFilmographySource;
pub use http::HttpFilmographySource;

use std::sync::Arc;

use async_trait::async_trait;
use reelbase_common::config::{ServiceConfig, SourceLocation};
use reelbase_common::models::normalize_metascore;
use reelbase_common::query::is_movie_id;
use reelbase_common::{Error, MovieRecord, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Provider of a subject's filmography
#[async_trait]
pub trait FilmographySource: Send + Sync {
    /// Human-readable location, for logs
    fn describe(&self) -> String;

    /// Fetch and normalize the filmography of `subject_id`
    ///
    /// Any failure to reach or read the provider is `Error::SourceUnavailable`.
    async fn fetch_filmography(&self, subject_id: &str) -> Result<Vec<MovieRecord>>;
}

/// Stand-in used when no provider is configured
pub struct UnconfiguredSource;

#[async_trait]
impl FilmographySource for UnconfiguredSource {
    fn describe(&self) -> String {
        "unconfigured".to_string()
    }

    async fn fetch_filmography(&self, _subject_id: &str) -> Result<Vec<MovieRecord>> {
        Err(Error::SourceUnavailable(
            "no filmography source configured (set source.url or source.file)".to_string(),
        ))
    }
}

/// Build the source named by the configuration
pub fn build_source(config: &ServiceConfig) -> Result<Arc<dyn FilmographySource>> {
    let source: Arc<dyn FilmographySource> = match &config.source {
        Some(SourceLocation::Http { base_url }) => Arc::new(HttpFilmographySource::new(
            base_url.clone(),
            config.source_timeout,
        )?),
        Some(SourceLocation::File { path }) => {
            Arc::new(FileFilmographySource::new(path.clone()))
        }
        None => {
            warn!("No filmography source configured; populate will fail");
            Arc::new(UnconfiguredSource)
        }
    };
    Ok(source)
}

/// Movie entry as published by a provider
///
/// Scalar fields are loosely typed because providers disagree on whether
/// numbers arrive as numbers or strings.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceMovie {
    pub id: Option<String>,
    pub link: Option<String>,
    pub metascore: Option<Value>,
    pub synopsis: Option<String>,
    pub title: Option<String>,
    pub year: Option<Value>,
}

/// Parse a provider payload (a JSON array of movies)
pub fn parse_payload(bytes: &[u8]) -> Result<Vec<SourceMovie>> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::SourceUnavailable(format!("invalid filmography payload: {}", e)))
}

/// Normalize provider entries into catalog records
///
/// Entries without a valid movie id are dropped with a warning. Strings are
/// trimmed, out-of-range metascores become absent, reviews start empty.
/// Duplicate ids are kept so the store can report them.
pub fn normalize(entries: Vec<SourceMovie>) -> Vec<MovieRecord> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let id = entry.id.as_deref().map(str::trim).unwrap_or_default();
            if !is_movie_id(id) {
                warn!(id, title = ?entry.title, "Skipping filmography entry without a valid movie id");
                return None;
            }

            Some(MovieRecord {
                id: id.to_string(),
                link: trimmed(entry.link),
                metascore: normalize_metascore(integer_field(entry.metascore.as_ref())),
                synopsis: trimmed(entry.synopsis),
                title: trimmed(entry.title),
                year: integer_field(entry.year.as_ref()).and_then(|year| i32::try_from(year).ok()),
                reviews: Vec::new(),
            })
        })
        .collect()
}

fn trimmed(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn integer_field(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
