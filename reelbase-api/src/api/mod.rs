//! HTTP API handlers for reelbase-api

pub mod graphql;
pub mod health;
pub mod movies;

pub use graphql::{graphiql, graphql_handler};
pub use health::health_routes;
pub use movies::{populate_movies, random_movie, review_movie, search_movies, specific_movie};
