//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts.
//! - Keep SQL details inside the catalog persistence boundary.
//! - Own the explicit set-null delete hooks for author and book rows.
//!
//! # Invariants
//! - Writes call the model's `validate()` before any SQL mutation.
//! - `get_*` returns `Ok(None)` for missing rows; `update_*`/`delete_*`
//!   return `RepoError::NotFound`.
//! - Deleting a referenced row detaches referencing rows in the same
//!   transaction; nothing is cascade-deleted except association rows.

use crate::db::DbError;
use crate::model::ModelValidationError;
use rusqlite::types::Value;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod author_repo;
pub mod book_instance_repo;
pub mod book_repo;
pub mod genre_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all catalog repositories.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    Db(DbError),
    NotFound { entity: &'static str, id: String },
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl RepoError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of a delete that detached referencing rows instead of removing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteOutcome {
    /// Number of referencing rows whose foreign key was set to NULL.
    pub detached: usize,
}

pub(crate) fn ensure_tables(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    for table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

pub(crate) fn push_pagination(
    sql: &mut String,
    bind_values: &mut Vec<Value>,
    limit: Option<u32>,
    offset: u32,
) {
    if let Some(limit) = limit {
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        if offset > 0 {
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(offset)));
        }
    } else if offset > 0 {
        sql.push_str(" LIMIT -1 OFFSET ?");
        bind_values.push(Value::Integer(i64::from(offset)));
    }
}
