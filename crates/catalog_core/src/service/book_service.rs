//! Book use-case service.
//!
//! # Responsibility
//! - Create books with de-duplicated genre links.
//! - Render the bounded genre column via [`display_genre`].
//! - Build book detail-view addresses.

use crate::model::book::{display_genre, Book, BookGenre, BookId, NewBook};
use crate::model::genre::{Genre, GenreId};
use crate::repo::book_repo::{BookListQuery, BookRepository};
use crate::repo::{DeleteOutcome, RepoError, RepoResult};
use crate::urls::{ReverseError, UrlResolver, BOOK_DETAIL};
use std::collections::BTreeSet;

/// Use-case service wrapper for book operations.
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_book(&self, book: &NewBook) -> RepoResult<Book> {
        let mut book = book.clone();
        book.genres = dedup_genres(&book.genres);
        self.repo.create_book(&book)
    }

    pub fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.repo.get_book(id)
    }

    pub fn list_books(&self, query: &BookListQuery) -> RepoResult<Vec<Book>> {
        self.repo.list_books(query)
    }

    pub fn update_book(&self, book: &Book) -> RepoResult<()> {
        self.repo.update_book(book)
    }

    /// Deletes a book; its copies stay with `book = None`.
    pub fn delete_book(&self, id: BookId) -> RepoResult<DeleteOutcome> {
        self.repo.delete_book(id)
    }

    /// Replaces all genre links of a book.
    pub fn set_genres(&self, id: BookId, genres: &[GenreId]) -> RepoResult<Vec<Genre>> {
        self.repo.set_book_genres(id, &dedup_genres(genres))?;
        self.repo.list_book_genres(id)
    }

    pub fn genres(&self, id: BookId) -> RepoResult<Vec<Genre>> {
        self.repo.list_book_genres(id)
    }

    /// Association rows linking the book to its genres.
    pub fn genre_links(&self, id: BookId) -> RepoResult<Vec<BookGenre>> {
        if self.repo.get_book(id)?.is_none() {
            return Err(RepoError::not_found("book", id));
        }
        self.repo.list_genre_links(id)
    }

    /// Comma-joined names of at most three linked genres, in storage order.
    ///
    /// Returns an empty string for a book without genres.
    pub fn display_genre(&self, id: BookId) -> RepoResult<String> {
        if self.repo.get_book(id)?.is_none() {
            return Err(RepoError::not_found("book", id));
        }
        let genres = self.repo.list_book_genres(id)?;
        Ok(display_genre(genres.iter().map(|genre| genre.name.as_str())))
    }

    /// Detail-view address for a book, e.g. `/catalog/book/12`.
    pub fn detail_url(&self, book: &Book, urls: &UrlResolver) -> Result<String, ReverseError> {
        book_detail_url(book, urls)
    }
}

pub fn book_detail_url(book: &Book, urls: &UrlResolver) -> Result<String, ReverseError> {
    urls.reverse(BOOK_DETAIL, &[book.id.to_string().as_str()])
}

fn dedup_genres(genres: &[GenreId]) -> Vec<GenreId> {
    let mut seen = BTreeSet::new();
    genres
        .iter()
        .copied()
        .filter(|genre| seen.insert(*genre))
        .collect()
}
