//! Catalog capability interface
//!
//! Both gateways (REST and GraphQL) talk to the catalog only through
//! [`CatalogStore`], so query semantics live in exactly one place.

use async_trait::async_trait;
use reelbase_common::{MovieRecord, Result, Review};
use serde::Serialize;

/// Outcome of a populate run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulateSummary {
    pub inserted_count: u64,
}

/// Persistence operations against the movie collection
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch the configured filmography and bulk-insert it
    ///
    /// # Returns
    /// * `Err(Error::SourceUnavailable)` - the data source could not be reached
    /// * `Err(Error::Persistence)` - the insert was rejected (e.g. duplicate id);
    ///   nothing from the batch is stored
    async fn populate(&self) -> Result<PopulateSummary>;

    /// Uniformly random record with `metascore > threshold`, if any
    async fn random_above_threshold(&self, threshold: i64) -> Result<Option<MovieRecord>>;

    /// Exact id lookup
    async fn find_by_id(&self, id: &str) -> Result<Option<MovieRecord>>;

    /// Up to `limit` records with `metascore > min_metascore`
    ///
    /// Order is insertion order. `limit <= 0` yields an empty result; the
    /// store applies no upper bound.
    async fn search(&self, min_metascore: i64, limit: i64) -> Result<Vec<MovieRecord>>;

    /// Append `review` to the record's reviews and return the updated record
    ///
    /// Returns `Err(Error::NotFound)` without mutating anything when `id`
    /// does not exist.
    async fn append_review(&self, id: &str, review: Review) -> Result<MovieRecord>;

    /// Number of stored records
    async fn count(&self) -> Result<u64>;
}
