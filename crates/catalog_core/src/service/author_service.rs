//! Author use-case service.
//!
//! # Invariants
//! - Deleting an author never deletes books; see `AuthorRepository::delete_author`.

use crate::model::author::{Author, AuthorId, NewAuthor};
use crate::repo::author_repo::{AuthorListQuery, AuthorRepository};
use crate::repo::{DeleteOutcome, RepoResult};
use crate::urls::{ReverseError, UrlResolver, AUTHOR_DETAIL};

/// Use-case service wrapper for author operations.
pub struct AuthorService<R: AuthorRepository> {
    repo: R,
}

impl<R: AuthorRepository> AuthorService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_author(&self, author: &NewAuthor) -> RepoResult<Author> {
        self.repo.create_author(author)
    }

    pub fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        self.repo.get_author(id)
    }

    /// Lists authors in default `(last_name, first_name)` order.
    pub fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>> {
        self.repo.list_authors(query)
    }

    pub fn update_author(&self, author: &Author) -> RepoResult<()> {
        self.repo.update_author(author)
    }

    /// Deletes an author; their books stay with `author = None`.
    pub fn delete_author(&self, id: AuthorId) -> RepoResult<DeleteOutcome> {
        self.repo.delete_author(id)
    }

    /// Detail-view address for an author, e.g. `/catalog/author/3`.
    pub fn detail_url(&self, author: &Author, urls: &UrlResolver) -> Result<String, ReverseError> {
        author_detail_url(author, urls)
    }
}

pub fn author_detail_url(author: &Author, urls: &UrlResolver) -> Result<String, ReverseError> {
    urls.reverse(AUTHOR_DETAIL, &[author.id.to_string().as_str()])
}
