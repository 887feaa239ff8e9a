//! Local JSON file provider, for offline seeding

use std::path::PathBuf;

use async_trait::async_trait;
use reelbase_common::{Error, MovieRecord, Result};
use tracing::debug;

use super::{normalize, parse_payload, FilmographySource};

/// Reads the filmography from a JSON array on disk
///
/// The file holds a single subject's filmography; the subject id is only
/// logged.
pub struct FileFilmographySource {
    path: PathBuf,
}

impl FileFilmographySource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl FilmographySource for FileFilmographySource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_filmography(&self, subject_id: &str) -> Result<Vec<MovieRecord>> {
        debug!(subject = %subject_id, path = %self.path.display(), "Reading filmography file");

        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            Error::SourceUnavailable(format!("reading {} failed: {}", self.path.display(), e))
        })?;

        Ok(normalize(parse_payload(&bytes)?))
    }
}
