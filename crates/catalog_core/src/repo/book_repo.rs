//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist book rows and their explicit `book_genres` association rows.
//! - Detach book instances before deleting a book.
//!
//! # Invariants
//! - Genre links are replaced as a whole set inside one transaction.
//! - Genre reads carry no ORDER BY; callers get storage order.
//! - `delete_book` never deletes book instances, only nulls their `book_id`.

use crate::model::author::AuthorId;
use crate::model::book::{Book, BookGenre, BookId, NewBook};
use crate::model::genre::{Genre, GenreId};
use crate::repo::genre_repo::parse_genre_row;
use crate::repo::{ensure_tables, push_pagination, DeleteOutcome, RepoError, RepoResult};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author_id,
    summary,
    isbn
FROM books";

/// Query options for listing books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookListQuery {
    /// Only books written by this author.
    pub author: Option<AuthorId>,
    /// Only books linked to this genre.
    pub genre: Option<GenreId>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for books and their genre links.
pub trait BookRepository {
    /// Inserts the book and its initial genre links in one transaction.
    fn create_book(&self, book: &NewBook) -> RepoResult<Book>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn list_books(&self, query: &BookListQuery) -> RepoResult<Vec<Book>>;
    fn update_book(&self, book: &Book) -> RepoResult<()>;
    /// Deletes one book, detaching its instances and dropping genre links.
    fn delete_book(&self, id: BookId) -> RepoResult<DeleteOutcome>;
    /// Replaces the full genre set for a book.
    fn set_book_genres(&self, id: BookId, genres: &[GenreId]) -> RepoResult<()>;
    /// Returns linked genres in storage order.
    fn list_book_genres(&self, id: BookId) -> RepoResult<Vec<Genre>>;
    /// Returns the raw association rows for a book, in storage order.
    fn list_genre_links(&self, id: BookId) -> RepoResult<Vec<BookGenre>>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["books", "book_genres", "genres", "book_instances"])?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: &NewBook) -> RepoResult<Book> {
        book.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO books (
                title,
                author_id,
                summary,
                isbn
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                book.title.as_str(),
                book.author,
                book.summary.as_str(),
                book.isbn.as_str(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        insert_genre_links(&tx, id, &book.genres)?;
        tx.commit()?;

        Ok(Book {
            id,
            title: book.title.clone(),
            author: book.author,
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
        })
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }
        Ok(None)
    }

    fn list_books(&self, query: &BookListQuery) -> RepoResult<Vec<Book>> {
        let mut sql = format!("{BOOK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(author) = query.author {
            sql.push_str(" AND author_id = ?");
            bind_values.push(Value::Integer(author));
        }

        if let Some(genre) = query.genre {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM book_genres bg
                    WHERE bg.book_id = books.id
                      AND bg.genre_id = ?
                )",
            );
            bind_values.push(Value::Integer(genre));
        }

        sql.push_str(" ORDER BY id ASC");
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }

    fn update_book(&self, book: &Book) -> RepoResult<()> {
        book.validate()?;

        let changed = self.conn.execute(
            "UPDATE books
             SET
                title = ?1,
                author_id = ?2,
                summary = ?3,
                isbn = ?4
             WHERE id = ?5;",
            params![
                book.title.as_str(),
                book.author,
                book.summary.as_str(),
                book.isbn.as_str(),
                book.id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("book", book.id));
        }
        Ok(())
    }

    fn delete_book(&self, id: BookId) -> RepoResult<DeleteOutcome> {
        let tx = self.conn.unchecked_transaction()?;
        let detached = tx.execute(
            "UPDATE book_instances SET book_id = NULL WHERE book_id = ?1;",
            [id],
        )?;
        tx.execute("DELETE FROM book_genres WHERE book_id = ?1;", [id])?;
        let deleted = tx.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        if deleted == 0 {
            return Err(RepoError::not_found("book", id));
        }
        tx.commit()?;

        info!("event=book_delete module=repo status=ok book_id={id} detached_instances={detached}");
        Ok(DeleteOutcome { detached })
    }

    fn set_book_genres(&self, id: BookId, genres: &[GenreId]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM books WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::not_found("book", id));
        }

        tx.execute("DELETE FROM book_genres WHERE book_id = ?1;", [id])?;
        insert_genre_links(&tx, id, genres)?;
        tx.commit()?;
        Ok(())
    }

    fn list_book_genres(&self, id: BookId) -> RepoResult<Vec<Genre>> {
        let mut stmt = self.conn.prepare(
            "SELECT g.id, g.name
             FROM book_genres bg
             INNER JOIN genres g ON g.id = bg.genre_id
             WHERE bg.book_id = ?1;",
        )?;
        let mut rows = stmt.query([id])?;
        let mut genres = Vec::new();
        while let Some(row) = rows.next()? {
            genres.push(parse_genre_row(row)?);
        }
        Ok(genres)
    }

    fn list_genre_links(&self, id: BookId) -> RepoResult<Vec<BookGenre>> {
        let mut stmt = self
            .conn
            .prepare("SELECT book_id, genre_id FROM book_genres WHERE book_id = ?1;")?;
        let mut rows = stmt.query([id])?;
        let mut links = Vec::new();
        while let Some(row) = rows.next()? {
            links.push(BookGenre {
                book_id: row.get("book_id")?,
                genre_id: row.get("genre_id")?,
            });
        }
        Ok(links)
    }
}

fn insert_genre_links(conn: &Connection, book_id: BookId, genres: &[GenreId]) -> RepoResult<()> {
    for genre_id in genres {
        conn.execute(
            "INSERT OR IGNORE INTO book_genres (book_id, genre_id) VALUES (?1, ?2);",
            params![book_id, genre_id],
        )?;
    }
    Ok(())
}

pub(crate) fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    Ok(Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get("author_id")?,
        summary: row.get("summary")?,
        isbn: row.get("isbn")?,
    })
}
