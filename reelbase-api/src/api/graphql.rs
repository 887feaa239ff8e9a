//! GraphQL gateway
//!
//! Exposes the catalog operations as fields of the `Query` type. Resolvers
//! delegate to the same [`CatalogStore`] as the REST handlers; store errors
//! become GraphQL error entries carrying an `extensions.code`.

use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql::{
    EmptyMutation, EmptySubscription, ErrorExtensions, Object, Pos, Schema, SimpleObject,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{Html, IntoResponse},
    Json,
};
use reelbase_common::query::{validate_movie_id, DEFAULT_SEARCH_LIMIT, DEFAULT_SEARCH_METASCORE};
use reelbase_common::{Error, MovieRecord, Review};
use tracing::{error, warn};

use crate::catalog::{CatalogStore, PopulateSummary};
use crate::{AppState, GatewaySettings};

pub type CatalogSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Movie object type
#[derive(Debug, Clone, SimpleObject)]
pub struct Movie {
    pub id: String,
    pub link: String,
    pub metascore: Option<i32>,
    pub synopsis: String,
    pub title: String,
    pub year: Option<i32>,
    pub reviews: Vec<MovieReview>,
}

/// Review entry attached to a movie
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Review")]
pub struct MovieReview {
    pub date: String,
    pub review: String,
}

/// Result of a populate run
#[derive(Debug, Clone, SimpleObject)]
pub struct PopulateResult {
    pub inserted_count: u64,
}

impl From<MovieRecord> for Movie {
    fn from(record: MovieRecord) -> Self {
        Self {
            id: record.id,
            link: record.link,
            metascore: record.metascore,
            synopsis: record.synopsis,
            title: record.title,
            year: record.year,
            reviews: record
                .reviews
                .into_iter()
                .map(|r| MovieReview {
                    date: r.date,
                    review: r.review,
                })
                .collect(),
        }
    }
}

impl From<PopulateSummary> for PopulateResult {
    fn from(summary: PopulateSummary) -> Self {
        Self {
            inserted_count: summary.inserted_count,
        }
    }
}

/// Log a catalog error and convert it into a GraphQL error entry
fn to_graphql_error(err: Error) -> async_graphql::Error {
    let code = err.code();
    match &err {
        Error::NotFound(_) | Error::InvalidInput(_) => {
            warn!(code, "GraphQL field rejected: {}", err)
        }
        _ => error!(code, "GraphQL field failed: {}", err),
    }
    async_graphql::Error::new(err.to_string()).extend_with(|_, ext| ext.set("code", code))
}

/// Root query object
pub struct QueryRoot {
    catalog: Arc<dyn CatalogStore>,
    settings: GatewaySettings,
}

impl QueryRoot {
    pub fn new(catalog: Arc<dyn CatalogStore>, settings: GatewaySettings) -> Self {
        Self { catalog, settings }
    }
}

#[Object(name = "Query")]
impl QueryRoot {
    /// Populate the catalog from the filmography source
    async fn populate(&self) -> async_graphql::Result<PopulateResult> {
        self.catalog
            .populate()
            .await
            .map(PopulateResult::from)
            .map_err(to_graphql_error)
    }

    /// A random must-watch movie, or null when none qualifies
    async fn random(&self) -> async_graphql::Result<Option<Movie>> {
        self.catalog
            .random_above_threshold(self.settings.metascore_threshold)
            .await
            .map(|movie| movie.map(Movie::from))
            .map_err(to_graphql_error)
    }

    /// A specific movie by id, or null when absent
    async fn specific(&self, id: String) -> async_graphql::Result<Option<Movie>> {
        let id = validate_movie_id(&id).map_err(to_graphql_error)?;
        self.catalog
            .find_by_id(id)
            .await
            .map(|movie| movie.map(Movie::from))
            .map_err(to_graphql_error)
    }

    /// Movies scoring above `metascore`, at most `limit` of them
    async fn search(
        &self,
        metascore: Option<i32>,
        limit: Option<i32>,
    ) -> async_graphql::Result<Vec<Movie>> {
        let metascore = metascore.map(i64::from).unwrap_or(DEFAULT_SEARCH_METASCORE);
        let limit = self
            .settings
            .cap_limit(limit.map(i64::from).unwrap_or(DEFAULT_SEARCH_LIMIT));

        self.catalog
            .search(metascore, limit)
            .await
            .map(|movies| movies.into_iter().map(Movie::from).collect())
            .map_err(to_graphql_error)
    }

    /// Save a watched date and a review, returning the updated movie
    async fn review(
        &self,
        id: String,
        date: String,
        review: String,
    ) -> async_graphql::Result<Movie> {
        let id = validate_movie_id(&id).map_err(to_graphql_error)?;
        self.catalog
            .append_review(id, Review::new(date, review))
            .await
            .map(Movie::from)
            .map_err(to_graphql_error)
    }
}

/// Build the schema around an injected catalog
pub fn build_schema(catalog: Arc<dyn CatalogStore>, settings: GatewaySettings) -> CatalogSchema {
    Schema::build(
        QueryRoot::new(catalog, settings),
        EmptyMutation,
        EmptySubscription,
    )
    .finish()
}

/// POST /graphql
///
/// An undecodable body is answered with a GraphQL error list, not a plain
/// text rejection.
pub async fn graphql_handler(
    State(state): State<AppState>,
    request: Result<Json<async_graphql::Request>, JsonRejection>,
) -> Json<async_graphql::Response> {
    match request {
        Ok(Json(request)) => Json(state.schema.execute(request).await),
        Err(rejection) => {
            warn!(code = "BAD_REQUEST", "GraphQL request rejected: {}", rejection.body_text());
            let err = async_graphql::Error::new(rejection.body_text())
                .extend_with(|_, ext| ext.set("code", "BAD_REQUEST"))
                .into_server_error(Pos::default());
            Json(async_graphql::Response::from_errors(vec![err]))
        }
    }
}

/// GET /graphql
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdl_exposes_catalog_fields() {
        struct NoCatalog;

        #[async_trait::async_trait]
        impl CatalogStore for NoCatalog {
            async fn populate(&self) -> reelbase_common::Result<PopulateSummary> {
                unimplemented!()
            }
            async fn random_above_threshold(
                &self,
                _threshold: i64,
            ) -> reelbase_common::Result<Option<MovieRecord>> {
                unimplemented!()
            }
            async fn find_by_id(&self, _id: &str) -> reelbase_common::Result<Option<MovieRecord>> {
                unimplemented!()
            }
            async fn search(
                &self,
                _min_metascore: i64,
                _limit: i64,
            ) -> reelbase_common::Result<Vec<MovieRecord>> {
                unimplemented!()
            }
            async fn append_review(
                &self,
                _id: &str,
                _review: Review,
            ) -> reelbase_common::Result<MovieRecord> {
                unimplemented!()
            }
            async fn count(&self) -> reelbase_common::Result<u64> {
                unimplemented!()
            }
        }

        let schema = build_schema(
            Arc::new(NoCatalog),
            GatewaySettings {
                metascore_threshold: 70,
                max_search_limit: 100,
            },
        );
        let sdl = schema.sdl();

        assert!(sdl.contains("type Query {"), "{}", sdl);
        for field in [
            "populate: PopulateResult!",
            "random: Movie",
            "specific(id: String!): Movie",
            "search(metascore: Int, limit: Int): [Movie!]!",
            "review(id: String!, date: String!, review: String!): Movie!",
            "insertedCount: Int!",
        ] {
            assert!(sdl.contains(field), "SDL missing `{}`:\n{}", field, sdl);
        }
    }
}
