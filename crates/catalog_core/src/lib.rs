//! Library catalog core: genres, authors, books and loanable copies.
//!
//! This crate owns the catalog's relational invariants (set-null deletes,
//! default ordering, loan status choices) and the admin declarations that
//! describe how the entities are browsed and edited.

pub mod admin;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod urls;

pub use admin::{AdminConfigError, AdminError, AdminSite, Entity, ModelAdmin};
pub use logging::{default_log_level, init_logging, init_logging_with, logging_status, LoggingConfig};
pub use model::author::{Author, AuthorId, NewAuthor};
pub use model::book::{display_genre, Book, BookGenre, BookId, NewBook, DISPLAY_GENRE_LIMIT};
pub use model::book_instance::{BookInstance, BookInstanceId, LoanStatus};
pub use model::genre::{Genre, GenreId, NewGenre};
pub use model::ModelValidationError;
pub use repo::author_repo::{AuthorListQuery, AuthorRepository, SqliteAuthorRepository};
pub use repo::book_instance_repo::{
    BookInstanceListQuery, BookInstanceRepository, DueBackFilter, SqliteBookInstanceRepository,
    StatusFilter,
};
pub use repo::book_repo::{BookListQuery, BookRepository, SqliteBookRepository};
pub use repo::genre_repo::{GenreRepository, SqliteGenreRepository};
pub use repo::{DeleteOutcome, RepoError, RepoResult};
pub use service::author_service::AuthorService;
pub use service::book_service::BookService;
pub use service::loan_service::LoanService;
pub use urls::{ReverseError, UrlResolver};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
