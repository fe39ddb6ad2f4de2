//! Genre repository contract and SQLite implementation.

use crate::model::genre::{Genre, GenreId, NewGenre};
use crate::repo::{ensure_tables, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, Row};

const GENRE_SELECT_SQL: &str = "SELECT id, name FROM genres";

/// Repository interface for genre CRUD operations.
pub trait GenreRepository {
    fn create_genre(&self, genre: &NewGenre) -> RepoResult<Genre>;
    fn get_genre(&self, id: GenreId) -> RepoResult<Option<Genre>>;
    /// Lists all genres in insertion order.
    fn list_genres(&self) -> RepoResult<Vec<Genre>>;
    fn update_genre(&self, genre: &Genre) -> RepoResult<()>;
    /// Deletes a genre and its book links; linked books are kept.
    fn delete_genre(&self, id: GenreId) -> RepoResult<()>;
}

/// SQLite-backed genre repository.
pub struct SqliteGenreRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGenreRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["genres", "book_genres"])?;
        Ok(Self { conn })
    }
}

impl GenreRepository for SqliteGenreRepository<'_> {
    fn create_genre(&self, genre: &NewGenre) -> RepoResult<Genre> {
        genre.validate()?;

        self.conn
            .execute("INSERT INTO genres (name) VALUES (?1);", [genre.name.as_str()])?;

        Ok(Genre {
            id: self.conn.last_insert_rowid(),
            name: genre.name.clone(),
        })
    }

    fn get_genre(&self, id: GenreId) -> RepoResult<Option<Genre>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GENRE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_genre_row(row)?));
        }
        Ok(None)
    }

    fn list_genres(&self) -> RepoResult<Vec<Genre>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GENRE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut genres = Vec::new();
        while let Some(row) = rows.next()? {
            genres.push(parse_genre_row(row)?);
        }
        Ok(genres)
    }

    fn update_genre(&self, genre: &Genre) -> RepoResult<()> {
        genre.validate()?;

        let changed = self.conn.execute(
            "UPDATE genres SET name = ?1 WHERE id = ?2;",
            params![genre.name.as_str(), genre.id],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("genre", genre.id));
        }
        Ok(())
    }

    fn delete_genre(&self, id: GenreId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let unlinked = tx.execute("DELETE FROM book_genres WHERE genre_id = ?1;", [id])?;
        let deleted = tx.execute("DELETE FROM genres WHERE id = ?1;", [id])?;
        if deleted == 0 {
            return Err(RepoError::not_found("genre", id));
        }
        tx.commit()?;

        info!("event=genre_delete module=repo status=ok genre_id={id} unlinked_books={unlinked}");
        Ok(())
    }
}

pub(crate) fn parse_genre_row(row: &Row<'_>) -> RepoResult<Genre> {
    Ok(Genre {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
