//! Author repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing always orders by `last_name, first_name` (then `id` for ties).
//! - `delete_author` clears `books.author_id` for every referencing book in the
//!   same transaction as the delete; books are never removed.

use crate::model::author::{Author, AuthorId, NewAuthor};
use crate::repo::{ensure_tables, push_pagination, DeleteOutcome, RepoError, RepoResult};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const AUTHOR_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    date_of_birth,
    date_of_death
FROM authors";

const AUTHOR_ORDER_SQL: &str = " ORDER BY last_name ASC, first_name ASC, id ASC";

/// Query options for listing authors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorListQuery {
    /// Exact, case-insensitive last-name match.
    pub last_name: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for author CRUD operations.
pub trait AuthorRepository {
    fn create_author(&self, author: &NewAuthor) -> RepoResult<Author>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>>;
    fn update_author(&self, author: &Author) -> RepoResult<()>;
    /// Deletes one author and detaches all of their books.
    fn delete_author(&self, id: AuthorId) -> RepoResult<DeleteOutcome>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["authors", "books"])?;
        Ok(Self { conn })
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn create_author(&self, author: &NewAuthor) -> RepoResult<Author> {
        author.validate()?;

        self.conn.execute(
            "INSERT INTO authors (
                first_name,
                last_name,
                date_of_birth,
                date_of_death
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                author.first_name.as_str(),
                author.last_name.as_str(),
                author.date_of_birth,
                author.date_of_death,
            ],
        )?;

        Ok(Author {
            id: self.conn.last_insert_rowid(),
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
        })
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_author_row(row)?));
        }
        Ok(None)
    }

    fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>> {
        let mut sql = format!("{AUTHOR_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(last_name) = query.last_name.as_ref() {
            sql.push_str(" AND last_name = ? COLLATE NOCASE");
            bind_values.push(Value::Text(last_name.clone()));
        }

        sql.push_str(AUTHOR_ORDER_SQL);
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(parse_author_row(row)?);
        }
        Ok(authors)
    }

    fn update_author(&self, author: &Author) -> RepoResult<()> {
        author.validate()?;

        let changed = self.conn.execute(
            "UPDATE authors
             SET
                first_name = ?1,
                last_name = ?2,
                date_of_birth = ?3,
                date_of_death = ?4
             WHERE id = ?5;",
            params![
                author.first_name.as_str(),
                author.last_name.as_str(),
                author.date_of_birth,
                author.date_of_death,
                author.id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("author", author.id));
        }
        Ok(())
    }

    fn delete_author(&self, id: AuthorId) -> RepoResult<DeleteOutcome> {
        let tx = self.conn.unchecked_transaction()?;
        let detached = tx.execute(
            "UPDATE books SET author_id = NULL WHERE author_id = ?1;",
            [id],
        )?;
        let deleted = tx.execute("DELETE FROM authors WHERE id = ?1;", [id])?;
        if deleted == 0 {
            return Err(RepoError::not_found("author", id));
        }
        tx.commit()?;

        info!("event=author_delete module=repo status=ok author_id={id} detached_books={detached}");
        Ok(DeleteOutcome { detached })
    }
}

pub(crate) fn parse_author_row(row: &Row<'_>) -> RepoResult<Author> {
    Ok(Author {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        date_of_birth: row.get("date_of_birth")?,
        date_of_death: row.get("date_of_death")?,
    })
}
