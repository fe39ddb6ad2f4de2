//! Book domain model and genre association.
//!
//! # Responsibility
//! - Define the title record (not a physical copy; see `book_instance`).
//! - Own the bounded genre display helper used by list views.
//!
//! # Invariants
//! - `author` is nullable; deleting the author clears it, never the book.
//! - Genre links live in [`BookGenre`] rows and carry no ordering.
//! - `summary` and `isbn` are required; `isbn` is bounded to 13 characters but
//!   its format is not checked.

use super::author::AuthorId;
use super::genre::GenreId;
use super::{check_max_len, check_required, ModelValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type BookId = i64;

pub const BOOK_TITLE_MAX_LEN: usize = 200;
pub const BOOK_SUMMARY_MAX_LEN: usize = 1000;
pub const BOOK_ISBN_MAX_LEN: usize = 13;

/// Maximum number of genre names rendered by [`display_genre`].
///
/// Genres past this count are silently omitted from the rendered string.
pub const DISPLAY_GENRE_LIMIT: usize = 3;

/// Persisted book row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: Option<AuthorId>,
    pub summary: String,
    pub isbn: String,
}

/// Input for creating a book together with its initial genre links.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: Option<AuthorId>,
    pub summary: String,
    pub isbn: String,
    pub genres: Vec<GenreId>,
}

/// Explicit many-to-many association row between a book and a genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookGenre {
    pub book_id: BookId,
    pub genre_id: GenreId,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            isbn: isbn.into(),
            ..Self::default()
        }
    }

    pub fn with_author(mut self, author: AuthorId) -> Self {
        self.author = Some(author);
        self
    }

    pub fn with_genres(mut self, genres: impl IntoIterator<Item = GenreId>) -> Self {
        self.genres = genres.into_iter().collect();
        self
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_fields(&self.title, &self.summary, &self.isbn)
    }
}

impl Book {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_fields(&self.title, &self.summary, &self.isbn)
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Joins up to [`DISPLAY_GENRE_LIMIT`] genre names with `", "`.
///
/// Names are taken in iteration order; callers passing association rows get
/// whatever order storage returned. Empty input yields an empty string.
pub fn display_genre<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .take(DISPLAY_GENRE_LIMIT)
        .map(|name| name.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn validate_fields(title: &str, summary: &str, isbn: &str) -> Result<(), ModelValidationError> {
    check_required("title", title)?;
    check_max_len("title", title, BOOK_TITLE_MAX_LEN)?;
    check_required("summary", summary)?;
    check_max_len("summary", summary, BOOK_SUMMARY_MAX_LEN)?;
    check_required("isbn", isbn)?;
    check_max_len("isbn", isbn, BOOK_ISBN_MAX_LEN)
}

#[cfg(test)]
mod tests {
    use super::{display_genre, NewBook, DISPLAY_GENRE_LIMIT};
    use crate::model::ModelValidationError;

    #[test]
    fn display_genre_truncates_after_limit() {
        let rendered = display_genre(["Dystopian", "Political", "Classic", "Fiction"]);
        assert_eq!(rendered, "Dystopian, Political, Classic");
        assert_eq!(rendered.split(", ").count(), DISPLAY_GENRE_LIMIT);
    }

    #[test]
    fn display_genre_empty_input_is_empty_string() {
        assert_eq!(display_genre(Vec::<String>::new()), "");
    }

    #[test]
    fn isbn_longer_than_13_is_rejected_but_format_is_not_checked() {
        let mut book = NewBook::new("1984", "A dystopian novel.", "not-an-isbn");
        assert!(book.validate().is_ok());

        book.isbn = "97800000000000".to_string();
        assert_eq!(
            book.validate().unwrap_err(),
            ModelValidationError::TooLong {
                field: "isbn",
                max: 13,
                actual: 14
            }
        );
    }

    #[test]
    fn summary_and_isbn_are_required() {
        let book = NewBook::new("1984", "", "9780451524935");
        assert_eq!(
            book.validate().unwrap_err(),
            ModelValidationError::Empty { field: "summary" }
        );

        let book = NewBook::new("1984", "A dystopian novel.", " ");
        assert_eq!(
            book.validate().unwrap_err(),
            ModelValidationError::Empty { field: "isbn" }
        );
    }
}
