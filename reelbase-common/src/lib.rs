//! # reelbase Common Library
//!
//! Shared code for the reelbase catalog service:
//! - Movie data model (`MovieRecord`, `Review`)
//! - Common error type
//! - Configuration loading and layering
//! - Query parameter parsing and movie id validation

pub mod config;
pub mod error;
pub mod models;
pub mod query;

pub use error::{Error, Result};
pub use models::{MovieRecord, Review};
