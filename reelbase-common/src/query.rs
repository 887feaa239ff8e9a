//! Query parameter parsing and movie id validation
//!
//! Numeric parameters arrive as untrusted strings. Malformed values are not
//! errors: they fall back to the caller's default. Range checks are left to
//! the caller.

use crate::{Error, Result};

/// Prefix shared by every external movie identifier
pub const MOVIE_ID_PREFIX: &str = "tt";

/// Default minimum metascore for searches
pub const DEFAULT_SEARCH_METASCORE: i64 = 0;

/// Default number of search results
pub const DEFAULT_SEARCH_LIMIT: i64 = 5;

/// Parse a base-10 integer, falling back to `default`
///
/// Returns `default` when `raw` is absent, blank, or not an integer.
/// Sign and range are not checked.
///
/// # Examples
/// ```
/// use reelbase_common::query::parse_int;
///
/// assert_eq!(parse_int(Some("12"), 5), 12);
/// assert_eq!(parse_int(Some("abc"), 5), 5);
/// assert_eq!(parse_int(None, 5), 5);
/// ```
pub fn parse_int(raw: Option<&str>, default: i64) -> i64 {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.parse::<i64>().unwrap_or(default),
        _ => default,
    }
}

/// True when `raw` matches `^tt\d+$`
pub fn is_movie_id(raw: &str) -> bool {
    raw.strip_prefix(MOVIE_ID_PREFIX)
        .map(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}

/// Validate a movie id before it reaches the store
pub fn validate_movie_id(raw: &str) -> Result<&str> {
    if is_movie_id(raw) {
        Ok(raw)
    } else {
        Err(Error::InvalidInput(format!(
            "Invalid movie id (expected {}<digits>): {}",
            MOVIE_ID_PREFIX, raw
        )))
    }
}
