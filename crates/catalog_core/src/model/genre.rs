//! Genre tag attachable to many books.

use super::{check_max_len, check_required, ModelValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type GenreId = i64;

pub const GENRE_NAME_MAX_LEN: usize = 200;

/// Persisted genre row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    /// Genre label, e.g. "Science Fiction". Not unique.
    pub name: String,
}

/// Input for creating a genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGenre {
    pub name: String,
}

impl NewGenre {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_name(&self.name)
    }
}

impl Genre {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_name(&self.name)
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn validate_name(name: &str) -> Result<(), ModelValidationError> {
    check_required("name", name)?;
    check_max_len("name", name, GENRE_NAME_MAX_LEN)
}
