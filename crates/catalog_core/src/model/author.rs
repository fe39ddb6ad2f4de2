//! Author domain model.
//!
//! # Invariants
//! - Default ordering is `(last_name, first_name)`; see [`Author::ordering_key`].
//! - Authors own books only through `Book::author`; there is no stored
//!   back-reference.

use super::{check_max_len, check_required, ModelValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type AuthorId = i64;

pub const AUTHOR_NAME_MAX_LEN: usize = 100;

/// Persisted author row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    /// Shown as "Died" in admin forms.
    pub date_of_death: Option<NaiveDate>,
}

/// Input for creating an author.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl NewAuthor {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_names(&self.first_name, &self.last_name)
    }
}

impl Author {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_names(&self.first_name, &self.last_name)
    }

    /// Key matching the default query ordering.
    pub fn ordering_key(&self) -> (&str, &str) {
        (self.last_name.as_str(), self.first_name.as_str())
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.last_name, self.first_name)
    }
}

fn validate_names(first_name: &str, last_name: &str) -> Result<(), ModelValidationError> {
    check_required("first_name", first_name)?;
    check_max_len("first_name", first_name, AUTHOR_NAME_MAX_LEN)?;
    check_required("last_name", last_name)?;
    check_max_len("last_name", last_name, AUTHOR_NAME_MAX_LEN)
}
