//! Loan bookkeeping for physical copies.
//!
//! Status changes are unrestricted: any status (or blank) may follow any
//! other, and `due_back` is independent of status.

use crate::model::book::BookId;
use crate::model::book_instance::{BookInstance, BookInstanceId, LoanStatus};
use crate::repo::book_instance_repo::{BookInstanceListQuery, BookInstanceRepository};
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use log::debug;

/// Use-case service wrapper for book instance operations.
pub struct LoanService<R: BookInstanceRepository> {
    repo: R,
}

impl<R: BookInstanceRepository> LoanService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a new copy with a generated id and `Maintenance` status.
    pub fn add_copy(
        &self,
        book: Option<BookId>,
        imprint: impl Into<String>,
    ) -> RepoResult<BookInstance> {
        let copy = BookInstance::new(book, imprint);
        self.repo.create_instance(&copy)?;
        Ok(copy)
    }

    pub fn get_copy(&self, id: BookInstanceId) -> RepoResult<Option<BookInstance>> {
        self.repo.get_instance(id)
    }

    /// Lists copies ordered by due date (undated first).
    pub fn list_copies(&self, query: &BookInstanceListQuery) -> RepoResult<Vec<BookInstance>> {
        self.repo.list_instances(query)
    }

    pub fn set_status(
        &self,
        id: BookInstanceId,
        status: Option<LoanStatus>,
    ) -> RepoResult<BookInstance> {
        let mut copy = self.load(id)?;
        debug!(
            "event=loan_status_change module=service instance_id={} from={} to={}",
            id,
            copy.status.map_or("", LoanStatus::code),
            status.map_or("", LoanStatus::code)
        );
        copy.status = status;
        self.repo.update_instance(&copy)?;
        Ok(copy)
    }

    pub fn set_due_back(
        &self,
        id: BookInstanceId,
        due_back: Option<NaiveDate>,
    ) -> RepoResult<BookInstance> {
        let mut copy = self.load(id)?;
        copy.due_back = due_back;
        self.repo.update_instance(&copy)?;
        Ok(copy)
    }

    pub fn update_copy(&self, copy: &BookInstance) -> RepoResult<()> {
        self.repo.update_instance(copy)
    }

    pub fn delete_copy(&self, id: BookInstanceId) -> RepoResult<()> {
        self.repo.delete_instance(id)
    }

    fn load(&self, id: BookInstanceId) -> RepoResult<BookInstance> {
        self.repo
            .get_instance(id)?
            .ok_or_else(|| RepoError::not_found("book instance", id))
    }
}
