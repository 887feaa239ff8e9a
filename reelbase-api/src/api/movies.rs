//! REST endpoints for the movie catalog
//!
//! - `GET  /movies/populate`  fill the catalog from the filmography source
//! - `GET  /movies`           random must-watch movie
//! - `GET  /movies/search`    filtered search (`metascore`, `limit`)
//! - `GET  /movies/:id`       one movie
//! - `POST /movies/:id`       append a review

use axum::{
    async_trait,
    extract::{
        rejection::{PathRejection, QueryRejection},
        FromRequest, Path, Query, Request, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use reelbase_common::query::{
    parse_int, validate_movie_id, DEFAULT_SEARCH_LIMIT, DEFAULT_SEARCH_METASCORE,
};
use reelbase_common::{MovieRecord, Review};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::catalog::PopulateSummary;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Raw search parameters; parsed leniently, never rejected
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub metascore: Option<String>,
    pub limit: Option<String>,
}

impl SearchParams {
    /// First occurrence of each known key wins; unknown keys are ignored
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "metascore" => &mut params.metascore,
                "limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Body of a review submission
#[derive(Debug, Deserialize)]
pub struct ReviewBody {
    pub date: String,
    pub review: String,
}

/// Review body accepted as JSON or as an urlencoded form
///
/// Rejections become `ApiError::BadRequest`, so clients always get the
/// JSON error body.
#[derive(Debug)]
pub struct ReviewPayload(pub ReviewBody);

#[async_trait]
impl<S> FromRequest<S> for ReviewPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        let body = if is_form {
            Form::<ReviewBody>::from_request(req, state)
                .await
                .map(|Form(body)| body)
                .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?
        } else {
            Json::<ReviewBody>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?
        };
        Ok(Self(body))
    }
}

fn path_id(path: Result<Path<String>, PathRejection>) -> ApiResult<String> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// GET /movies/populate
pub async fn populate_movies(State(state): State<AppState>) -> ApiResult<Json<PopulateSummary>> {
    let summary = state.catalog.populate().await?;
    Ok(Json(summary))
}

/// GET /movies
///
/// 204 with an empty body when no movie beats the must-watch threshold.
pub async fn random_movie(State(state): State<AppState>) -> ApiResult<Response> {
    let movie = state
        .catalog
        .random_above_threshold(state.settings.metascore_threshold)
        .await?;

    Ok(match movie {
        Some(movie) => Json(movie).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// GET /movies/:id
pub async fn specific_movie(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<MovieRecord>> {
    let id = path_id(path)?;
    let id = validate_movie_id(&id)?;

    state
        .catalog
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("movie {}", id)))
}

/// GET /movies/search?metascore=<int>&limit=<int>
///
/// A query string that cannot be decoded at all falls back to the defaults.
pub async fn search_movies(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Json<Vec<MovieRecord>>> {
    let params = match query {
        Ok(Query(pairs)) => SearchParams::from_pairs(pairs),
        Err(rejection) => {
            warn!("Ignoring undecodable search query: {}", rejection.body_text());
            SearchParams::default()
        }
    };
    let metascore = parse_int(params.metascore.as_deref(), DEFAULT_SEARCH_METASCORE);
    let limit = state
        .settings
        .cap_limit(parse_int(params.limit.as_deref(), DEFAULT_SEARCH_LIMIT));

    let movies = state.catalog.search(metascore, limit).await?;
    Ok(Json(movies))
}

/// POST /movies/:id with `{"date": ..., "review": ...}` (JSON or form)
pub async fn review_movie(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    ReviewPayload(body): ReviewPayload,
) -> ApiResult<Json<Value>> {
    let id = path_id(path)?;
    let id = validate_movie_id(&id)?;

    info!(id, date = %body.date, "Saving review");
    state
        .catalog
        .append_review(id, Review::new(body.date, body.review))
        .await?;

    Ok(Json(json!({ "ok": true })))
}
