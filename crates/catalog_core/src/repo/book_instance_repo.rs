//! Book instance (loanable copy) repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing orders by `due_back ASC` with SQLite's NULLS FIRST, then `id`.
//! - `update_instance` addresses rows by `id`; the id itself is never rewritten.
//! - Status values outside `m|o|a|r|''` are rejected by a CHECK constraint.

use crate::model::book::BookId;
use crate::model::book_instance::{
    parse_status_field, status_to_db, BookInstance, BookInstanceId, LoanStatus,
};
use crate::repo::{ensure_tables, push_pagination, RepoError, RepoResult};
use chrono::NaiveDate;
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const INSTANCE_SELECT_SQL: &str = "SELECT
    id,
    book_id,
    imprint,
    due_back,
    status
FROM book_instances";

/// Status predicate for instance listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Any,
    /// Only rows with a blank status.
    Blank,
    Is(LoanStatus),
}

/// Due-date predicate for instance listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DueBackFilter {
    #[default]
    Any,
    NoDate,
    HasDate,
    /// `from <= due_back < until`.
    Range { from: NaiveDate, until: NaiveDate },
}

/// Query options for listing book instances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookInstanceListQuery {
    pub book: Option<BookId>,
    pub status: StatusFilter,
    pub due_back: DueBackFilter,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for book instance CRUD operations.
pub trait BookInstanceRepository {
    fn create_instance(&self, instance: &BookInstance) -> RepoResult<BookInstanceId>;
    fn get_instance(&self, id: BookInstanceId) -> RepoResult<Option<BookInstance>>;
    fn list_instances(&self, query: &BookInstanceListQuery) -> RepoResult<Vec<BookInstance>>;
    fn update_instance(&self, instance: &BookInstance) -> RepoResult<()>;
    fn delete_instance(&self, id: BookInstanceId) -> RepoResult<()>;
}

/// SQLite-backed book instance repository.
pub struct SqliteBookInstanceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookInstanceRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["book_instances", "books"])?;
        Ok(Self { conn })
    }
}

impl BookInstanceRepository for SqliteBookInstanceRepository<'_> {
    fn create_instance(&self, instance: &BookInstance) -> RepoResult<BookInstanceId> {
        instance.validate()?;

        self.conn.execute(
            "INSERT INTO book_instances (
                id,
                book_id,
                imprint,
                due_back,
                status
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                instance.id.to_string(),
                instance.book,
                instance.imprint.as_str(),
                instance.due_back,
                status_to_db(instance.status),
            ],
        )?;

        Ok(instance.id)
    }

    fn get_instance(&self, id: BookInstanceId) -> RepoResult<Option<BookInstance>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{INSTANCE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_instance_row(row)?));
        }
        Ok(None)
    }

    fn list_instances(&self, query: &BookInstanceListQuery) -> RepoResult<Vec<BookInstance>> {
        let mut sql = format!("{INSTANCE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(book) = query.book {
            sql.push_str(" AND book_id = ?");
            bind_values.push(Value::Integer(book));
        }

        match query.status {
            StatusFilter::Any => {}
            StatusFilter::Blank => sql.push_str(" AND status = ''"),
            StatusFilter::Is(status) => {
                sql.push_str(" AND status = ?");
                bind_values.push(Value::Text(status.code().to_string()));
            }
        }

        match query.due_back {
            DueBackFilter::Any => {}
            DueBackFilter::NoDate => sql.push_str(" AND due_back IS NULL"),
            DueBackFilter::HasDate => sql.push_str(" AND due_back IS NOT NULL"),
            DueBackFilter::Range { from, until } => {
                sql.push_str(" AND due_back >= ? AND due_back < ?");
                bind_values.push(Value::Text(from.to_string()));
                bind_values.push(Value::Text(until.to_string()));
            }
        }

        sql.push_str(" ORDER BY due_back ASC, id ASC");
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut instances = Vec::new();
        while let Some(row) = rows.next()? {
            instances.push(parse_instance_row(row)?);
        }
        Ok(instances)
    }

    fn update_instance(&self, instance: &BookInstance) -> RepoResult<()> {
        instance.validate()?;

        let changed = self.conn.execute(
            "UPDATE book_instances
             SET
                book_id = ?1,
                imprint = ?2,
                due_back = ?3,
                status = ?4
             WHERE id = ?5;",
            params![
                instance.book,
                instance.imprint.as_str(),
                instance.due_back,
                status_to_db(instance.status),
                instance.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("book instance", instance.id));
        }
        Ok(())
    }

    fn delete_instance(&self, id: BookInstanceId) -> RepoResult<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM book_instances WHERE id = ?1;", [id.to_string()])?;
        if deleted == 0 {
            return Err(RepoError::not_found("book instance", id));
        }

        info!("event=book_instance_delete module=repo status=ok instance_id={id}");
        Ok(())
    }
}

fn parse_instance_row(row: &Row<'_>) -> RepoResult<BookInstance> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{id_text}` in book_instances.id"
        ))
    })?;

    let status_text: String = row.get("status")?;
    let status = parse_status_field(&status_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in book_instances.status"
        ))
    })?;

    Ok(BookInstance {
        id,
        book: row.get("book_id")?,
        imprint: row.get("imprint")?,
        due_back: row.get("due_back")?,
        status,
    })
}
