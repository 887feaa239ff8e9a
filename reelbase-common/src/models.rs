//! Catalog data model
//!
//! A `MovieRecord` is one catalog entry. Records are created in bulk by the
//! populate operation, read by the query operations, and mutated only by
//! appending to `reviews`.

use serde::{Deserialize, Serialize};

/// Lowest valid metascore
pub const METASCORE_MIN: i32 = 0;

/// Highest valid metascore
pub const METASCORE_MAX: i32 = 100;

/// One watched-date and review entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub date: String,
    pub review: String,
}

impl Review {
    pub fn new(date: impl Into<String>, review: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            review: review.into(),
        }
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// External identifier (`tt` followed by digits), unique and immutable
    pub id: String,
    #[serde(default)]
    pub link: String,
    /// Quality score in [0, 100]; `None` never passes a metascore filter
    #[serde(default)]
    pub metascore: Option<i32>,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    /// Append-only, in insertion order
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl MovieRecord {
    /// Create a record with no reviews
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            link: String::new(),
            metascore: None,
            synopsis: String::new(),
            title: title.into(),
            year: None,
            reviews: Vec::new(),
        }
    }

    pub fn with_metascore(mut self, metascore: i32) -> Self {
        self.metascore = Some(metascore);
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// True when the record has a metascore strictly above `threshold`
    pub fn scores_above(&self, threshold: i64) -> bool {
        self.metascore
            .map(|score| i64::from(score) > threshold)
            .unwrap_or(false)
    }
}

/// Clamp an incoming metascore to the valid range, dropping out-of-range values
pub fn normalize_metascore(raw: Option<i64>) -> Option<i32> {
    raw.filter(|score| (i64::from(METASCORE_MIN)..=i64::from(METASCORE_MAX)).contains(score))
        .map(|score| score as i32)
}
