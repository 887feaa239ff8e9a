//! HTTP filmography provider client

use std::time::Duration;

use async_trait::async_trait;
use reelbase_common::{Error, MovieRecord, Result};
use tracing::debug;

use super::{normalize, parse_payload, FilmographySource};

const USER_AGENT: &str = concat!("reelbase/", env!("CARGO_PKG_VERSION"));

/// Fetches `GET {base_url}/{subject_id}`, expecting a JSON array of movies
pub struct HttpFilmographySource {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpFilmographySource {
    /// Create a client whose requests give up after `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn filmography_url(&self, subject_id: &str) -> String {
        format!("{}/{}", self.base_url, subject_id)
    }
}

#[async_trait]
impl FilmographySource for HttpFilmographySource {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    async fn fetch_filmography(&self, subject_id: &str) -> Result<Vec<MovieRecord>> {
        let url = self.filmography_url(subject_id);
        debug!(subject = %subject_id, url = %url, "Querying filmography provider");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::SourceUnavailable(format!(
                "provider returned HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("reading {} failed: {}", url, e)))?;

        let movies = normalize(parse_payload(&body)?);
        debug!(subject = %subject_id, count = movies.len(), "Filmography fetched");
        Ok(movies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filmography_url_trims_slash() {
        let source =
            HttpFilmographySource::new("http://films.local/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            source.filmography_url("nm0000243"),
            "http://films.local/api/nm0000243"
        );
    }
}
