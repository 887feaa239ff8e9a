//! Movie collection operations
//!
//! SQLite implementation of [`CatalogStore`].

use std::sync::Arc;

use async_trait::async_trait;
use reelbase_common::{Error, MovieRecord, Result, Review};
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogStore, PopulateSummary};
use crate::source::FilmographySource;

const MOVIE_COLUMNS: &str = "id, link, metascore, synopsis, title, year, reviews";

/// Catalog backed by the shared SQLite pool
pub struct SqliteCatalog {
    pool: SqlitePool,
    source: Arc<dyn FilmographySource>,
    subject_id: String,
}

impl SqliteCatalog {
    pub fn new(
        pool: SqlitePool,
        source: Arc<dyn FilmographySource>,
        subject_id: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            source,
            subject_id: subject_id.into(),
        }
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn populate(&self) -> Result<PopulateSummary> {
        info!(
            subject = %self.subject_id,
            source = %self.source.describe(),
            "Fetching filmography"
        );
        let movies = self.source.fetch_filmography(&self.subject_id).await?;
        let inserted_count = insert_movies(&self.pool, &movies).await?;

        info!(inserted_count, "Catalog populated");
        Ok(PopulateSummary { inserted_count })
    }

    async fn random_above_threshold(&self, threshold: i64) -> Result<Option<MovieRecord>> {
        debug!(threshold, "Fetching random must-watch movie");
        let row = sqlx::query(&format!(
            "SELECT {} FROM movies WHERE metascore > ? ORDER BY RANDOM() LIMIT 1",
            MOVIE_COLUMNS
        ))
        .bind(threshold)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(movie_from_row).transpose()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<MovieRecord>> {
        debug!(id, "Fetching movie");
        let row = sqlx::query(&format!("SELECT {} FROM movies WHERE id = ?", MOVIE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(movie_from_row).transpose()
    }

    async fn search(&self, min_metascore: i64, limit: i64) -> Result<Vec<MovieRecord>> {
        debug!(min_metascore, limit, "Searching movies");
        // SQLite treats a negative LIMIT as "no limit"
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&format!(
            "SELECT {} FROM movies WHERE metascore > ? ORDER BY rowid ASC LIMIT ?",
            MOVIE_COLUMNS
        ))
        .bind(min_metascore)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(movie_from_row).collect()
    }

    async fn append_review(&self, id: &str, review: Review) -> Result<MovieRecord> {
        debug!(id, date = %review.date, "Saving review");
        // Single statement; concurrent appends serialize in SQLite
        let row = sqlx::query(&format!(
            r#"
            UPDATE movies
            SET reviews = json_insert(reviews, '$[#]', json_object('date', ?, 'review', ?))
            WHERE id = ?
            RETURNING {}
            "#,
            MOVIE_COLUMNS
        ))
        .bind(&review.date)
        .bind(&review.review)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => movie_from_row(&row),
            None => Err(Error::NotFound(format!("movie {}", id))),
        }
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

/// Insert all movies in one transaction
///
/// Any rejected row rolls back the whole batch and is reported as
/// `Error::Persistence` naming the offending id.
pub async fn insert_movies(pool: &SqlitePool, movies: &[MovieRecord]) -> Result<u64> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;

    for movie in movies {
        let result = sqlx::query(
            r#"
            INSERT INTO movies (id, link, metascore, synopsis, title, year, reviews)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&movie.id)
        .bind(&movie.link)
        .bind(movie.metascore)
        .bind(&movie.synopsis)
        .bind(&movie.title)
        .bind(movie.year)
        .bind(Json(&movie.reviews))
        .execute(&mut *tx)
        .await;

        match result {
            Ok(done) => inserted += done.rows_affected(),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                warn!(id = %movie.id, "Bulk insert rejected: duplicate movie id");
                return Err(Error::Persistence(format!("duplicate movie id {}", movie.id)));
            }
            Err(e) => {
                warn!(id = %movie.id, error = %e, "Bulk insert rejected");
                return Err(Error::Persistence(format!(
                    "insert of movie {} rejected: {}",
                    movie.id, e
                )));
            }
        }
    }

    tx.commit().await?;
    Ok(inserted)
}

fn movie_from_row(row: &SqliteRow) -> Result<MovieRecord> {
    let reviews: Json<Vec<Review>> = row.try_get("reviews")?;

    Ok(MovieRecord {
        id: row.try_get("id")?,
        link: row.try_get("link")?,
        metascore: row.try_get("metascore")?,
        synopsis: row.try_get("synopsis")?,
        title: row.try_get("title")?,
        year: row.try_get("year")?,
        reviews: reviews.0,
    })
}
