//! Physical, loanable copy of a book.
//!
//! # Invariants
//! - `id` is generated once at creation and never changes.
//! - `status` defaults to `Maintenance`; `None` represents a blank status.
//! - No transition rules: any status may follow any other.

use super::book::{Book, BookId};
use super::{check_max_len, check_required, ModelValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type BookInstanceId = Uuid;

pub const IMPRINT_MAX_LEN: usize = 200;

/// Loan availability of one copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoanStatus {
    #[serde(rename = "m")]
    Maintenance,
    #[serde(rename = "o")]
    OnLoan,
    #[serde(rename = "a")]
    Available,
    #[serde(rename = "r")]
    Reserved,
}

impl LoanStatus {
    /// All choices in declaration order.
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Maintenance,
        LoanStatus::OnLoan,
        LoanStatus::Available,
        LoanStatus::Reserved,
    ];

    /// Single-letter storage code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Maintenance => "m",
            Self::OnLoan => "o",
            Self::Available => "a",
            Self::Reserved => "r",
        }
    }

    /// Human-readable choice label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Maintenance => "Maintenance",
            Self::OnLoan => "On loan",
            Self::Available => "Available",
            Self::Reserved => "Reserved",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "m" => Some(Self::Maintenance),
            "o" => Some(Self::OnLoan),
            "a" => Some(Self::Available),
            "r" => Some(Self::Reserved),
            _ => None,
        }
    }
}

impl Display for LoanStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parses a stored/submitted status value; `""` is the blank status.
pub fn parse_status_field(value: &str) -> Result<Option<LoanStatus>, ModelValidationError> {
    if value.is_empty() {
        return Ok(None);
    }
    LoanStatus::from_code(value)
        .map(Some)
        .ok_or_else(|| ModelValidationError::InvalidChoice {
            field: "status",
            value: value.to_string(),
        })
}

/// Storage code for an optional status; blank maps to `""`.
pub fn status_to_db(status: Option<LoanStatus>) -> &'static str {
    status.map_or("", LoanStatus::code)
}

fn default_status() -> Option<LoanStatus> {
    Some(LoanStatus::Maintenance)
}

/// One loanable copy of a book.
///
/// A payload without a `status` key gets `Maintenance`; an explicit `null`
/// stays blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInstance {
    pub id: BookInstanceId,
    pub book: Option<BookId>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    #[serde(default = "default_status")]
    pub status: Option<LoanStatus>,
}

impl BookInstance {
    /// Creates a copy with a fresh v4 identifier and `Maintenance` status.
    pub fn new(book: Option<BookId>, imprint: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            book,
            imprint: imprint.into(),
            due_back: None,
            status: default_status(),
        }
    }

    /// Creates a copy with a caller-provided identifier (imports).
    pub fn with_id(
        id: BookInstanceId,
        book: Option<BookId>,
        imprint: impl Into<String>,
    ) -> Result<Self, ModelValidationError> {
        if id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        Ok(Self {
            id,
            ..Self::new(book, imprint)
        })
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        check_required("imprint", &self.imprint)?;
        check_max_len("imprint", &self.imprint, IMPRINT_MAX_LEN)
    }

    /// Canonical label: `"<id> (<book title>)"`, or just the id when unlinked.
    pub fn label(&self, book: Option<&Book>) -> String {
        match book {
            Some(book) => format!("{} ({})", self.id, book.title),
            None => self.id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_status_field, status_to_db, BookInstance, LoanStatus};
    use crate::model::ModelValidationError;
    use uuid::Uuid;

    #[test]
    fn new_instance_defaults_to_maintenance() {
        let copy = BookInstance::new(None, "Penguin");
        assert_eq!(copy.status, Some(LoanStatus::Maintenance));
        assert!(copy.due_back.is_none());
        assert!(!copy.id.is_nil());
    }

    #[test]
    fn status_codes_parse_and_blank_is_none() {
        for status in LoanStatus::ALL {
            assert_eq!(parse_status_field(status.code()).unwrap(), Some(status));
        }
        assert_eq!(parse_status_field("").unwrap(), None);
        assert_eq!(status_to_db(None), "");
    }

    #[test]
    fn unknown_status_code_is_rejected() {
        let err = parse_status_field("x").unwrap_err();
        assert!(matches!(err, ModelValidationError::InvalidChoice { field: "status", .. }));
    }

    #[test]
    fn blank_imprint_is_rejected() {
        let copy = BookInstance::new(None, "  ");
        assert_eq!(
            copy.validate().unwrap_err(),
            ModelValidationError::Empty { field: "imprint" }
        );
    }

    #[test]
    fn with_id_rejects_nil_uuid() {
        let err = BookInstance::with_id(Uuid::nil(), None, "x").unwrap_err();
        assert_eq!(err, ModelValidationError::NilId);
    }
}
