//! Common error types for reelbase

use thiserror::Error;

/// Common result type for reelbase operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds shared by the store, the data sources and both gateways
#[derive(Error, Debug)]
pub enum Error {
    /// External filmography fetch failed (network, timeout, bad payload)
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Store rejected a write (e.g. duplicate movie id)
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Lookup or update target missing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed id or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable code, shared by the REST and GraphQL error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Error::SourceUnavailable(_) => "SOURCE_UNAVAILABLE",
            Error::Persistence(_) => "PERSISTENCE_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::InvalidInput(_) => "BAD_REQUEST",
            Error::Database(_) => "DATABASE_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
