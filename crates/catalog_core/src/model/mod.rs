//! Catalog domain model.
//!
//! # Responsibility
//! - Define the four catalog record shapes and the genre association record.
//! - Provide canonical labels and field-level validation shared by all writers.
//!
//! # Invariants
//! - Foreign keys are explicit `Option<Id>` values; `None` means "unlinked".
//! - Models never cascade deletes; detaching is a repository concern.
//! - `validate()` must pass before any persistence write.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

/// Field-level validation failure for catalog records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Required text field is blank after trimming.
    Empty { field: &'static str },
    /// Text field exceeds its bounded length (in characters).
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    /// Identifier must not be the nil UUID.
    NilId,
    /// Enumerated field received a value outside its choices.
    InvalidChoice { field: &'static str, value: String },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "field `{field}` is required"),
            Self::TooLong { field, max, actual } => write!(
                f,
                "field `{field}` has {actual} characters; at most {max} allowed"
            ),
            Self::NilId => write!(f, "identifier must not be nil"),
            Self::InvalidChoice { field, value } => {
                write!(f, "`{value}` is not a valid choice for `{field}`")
            }
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn check_required(field: &'static str, value: &str) -> Result<(), ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError::Empty { field });
    }
    Ok(())
}

pub(crate) fn check_max_len(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ModelValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ModelValidationError::TooLong { field, max, actual });
    }
    Ok(())
}
