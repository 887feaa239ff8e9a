//! Database access layer for reelbase-api
//!
//! One shared `SqlitePool` backs every request handler. SQLite serializes
//! writers itself; there is no application-level locking.

mod movies;

pub use movies::SqliteCatalog;

use reelbase_common::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::info;

/// Connect to the catalog database and make sure the schema exists
///
/// `sqlite::memory:` gets a single connection, since every in-memory
/// connection is its own database.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(database_url)
        .await?;

    init_tables(&pool).await?;
    Ok(pool)
}

/// Create the movies table if it doesn't exist
///
/// `reviews` holds a JSON array of `{date, review}` objects. Row order
/// (rowid) is insertion order, which search relies on.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS movies (
            id TEXT PRIMARY KEY NOT NULL,
            link TEXT NOT NULL DEFAULT '',
            metascore INTEGER,
            synopsis TEXT NOT NULL DEFAULT '',
            title TEXT NOT NULL DEFAULT '',
            year INTEGER,
            reviews TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_movies_metascore ON movies (metascore)")
        .execute(pool)
        .await?;

    info!("Database tables initialized (movies)");
    Ok(())
}
