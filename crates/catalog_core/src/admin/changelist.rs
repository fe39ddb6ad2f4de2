//! Change-list and inline queries driven by admin declarations.
//!
//! # Responsibility
//! - Turn a [`ModelAdmin`]'s list columns and filters into repository queries.
//! - Produce header labels and display strings; no markup is generated.
//!
//! # Invariants
//! - Only filters named in `list_filter` may narrow a change list.
//! - Empty values render as [`EMPTY_VALUE_DISPLAY`].
//! - Entities without a declared ordering (genres, books) list newest first.
//! - Date filters are evaluated against a caller-supplied `today`.

use super::entity::{Entity, FieldKind, DISPLAY_GENRE_COLUMN, STR_COLUMN};
use super::options::{AdminConfigError, ModelAdmin};
use super::site::AdminSite;
use crate::model::author::{Author, AuthorId};
use crate::model::book::{display_genre, Book, BookId};
use crate::model::book_instance::BookInstance;
use crate::model::genre::Genre;
use crate::repo::author_repo::{AuthorListQuery, AuthorRepository, SqliteAuthorRepository};
use crate::repo::book_instance_repo::{
    BookInstanceListQuery, BookInstanceRepository, DueBackFilter, SqliteBookInstanceRepository,
    StatusFilter,
};
use crate::repo::book_repo::{BookListQuery, BookRepository, SqliteBookRepository};
use crate::repo::genre_repo::{GenreRepository, SqliteGenreRepository};
use crate::repo::{RepoError, RepoResult};
use chrono::{Datelike, Days, Months, NaiveDate};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Placeholder for null or blank values.
pub const EMPTY_VALUE_DISPLAY: &str = "-";

/// Relative date choices offered for date list filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    Any,
    Today,
    Past7Days,
    ThisMonth,
    ThisYear,
    NoDate,
    HasDate,
}

impl DateFilter {
    /// Choices in the order a filter sidebar offers them.
    pub const ALL: [DateFilter; 7] = [
        DateFilter::Any,
        DateFilter::Today,
        DateFilter::Past7Days,
        DateFilter::ThisMonth,
        DateFilter::ThisYear,
        DateFilter::NoDate,
        DateFilter::HasDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Any => "Any date",
            Self::Today => "Today",
            Self::Past7Days => "Past 7 days",
            Self::ThisMonth => "This month",
            Self::ThisYear => "This year",
            Self::NoDate => "No date",
            Self::HasDate => "Has date",
        }
    }

    /// Resolves the choice to a half-open date range relative to `today`.
    pub fn resolve(self, today: NaiveDate) -> DueBackFilter {
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        match self {
            Self::Any => DueBackFilter::Any,
            Self::NoDate => DueBackFilter::NoDate,
            Self::HasDate => DueBackFilter::HasDate,
            Self::Today => DueBackFilter::Range {
                from: today,
                until: tomorrow,
            },
            Self::Past7Days => DueBackFilter::Range {
                from: today.checked_sub_days(Days::new(7)).unwrap_or(today),
                until: tomorrow,
            },
            Self::ThisMonth => {
                let from = today.with_day(1).unwrap_or(today);
                DueBackFilter::Range {
                    from,
                    until: from.checked_add_months(Months::new(1)).unwrap_or(tomorrow),
                }
            }
            Self::ThisYear => {
                let from = today.with_ordinal(1).unwrap_or(today);
                DueBackFilter::Range {
                    from,
                    until: from.checked_add_months(Months::new(12)).unwrap_or(tomorrow),
                }
            }
        }
    }
}

/// Filter selections for one change-list request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeListFilters {
    pub status: StatusFilter,
    pub due_back: DateFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeListRow {
    /// Primary key of the rendered record.
    pub pk: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeList {
    pub entity: Entity,
    pub columns: Vec<Column>,
    pub rows: Vec<ChangeListRow>,
}

impl ChangeList {
    /// Cells of one column, top to bottom.
    pub fn column_values(&self, name: &str) -> Vec<&str> {
        let Some(index) = self.columns.iter().position(|column| column.name == name) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.cells.get(index).map(String::as_str))
            .collect()
    }
}

/// Failure while answering a change-list or inline request.
#[derive(Debug)]
pub enum AdminError {
    Config(AdminConfigError),
    Repo(RepoError),
    FilterNotAllowed { entity: Entity, field: &'static str },
    InlineNotDeclared { parent: Entity, child: Entity },
}

impl Display for AdminError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::FilterNotAllowed { entity, field } => {
                write!(f, "{entity} change list does not filter by `{field}`")
            }
            Self::InlineNotDeclared { parent, child } => {
                write!(f, "{parent} admin does not edit {child} inline")
            }
        }
    }
}

impl Error for AdminError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::FilterNotAllowed { .. } | Self::InlineNotDeclared { .. } => None,
        }
    }
}

impl From<AdminConfigError> for AdminError {
    fn from(value: AdminConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RepoError> for AdminError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Builds the change list for `entity` using its registered admin.
pub fn change_list(
    conn: &Connection,
    site: &AdminSite,
    entity: Entity,
    filters: &ChangeListFilters,
    today: NaiveDate,
) -> Result<ChangeList, AdminError> {
    let admin = site
        .get(entity)
        .ok_or(AdminConfigError::NotRegistered(entity))?;
    ensure_filter_allowed(admin, "status", filters.status != StatusFilter::Any)?;
    ensure_filter_allowed(admin, "due_back", filters.due_back != DateFilter::Any)?;

    let columns = admin
        .list_display
        .iter()
        .map(|name| Column {
            name: name.clone(),
            label: entity.column_label(name).unwrap_or(""),
        })
        .collect::<Vec<_>>();
    let renderer = CellRenderer::try_new(conn)?;

    let records = match entity {
        Entity::Genre => renderer
            .genres
            .list_genres()?
            .into_iter()
            .rev()
            .map(Record::Genre)
            .collect::<Vec<_>>(),
        Entity::Author => renderer
            .authors
            .list_authors(&AuthorListQuery::default())?
            .into_iter()
            .map(Record::Author)
            .collect(),
        Entity::Book => renderer
            .books
            .list_books(&BookListQuery::default())?
            .into_iter()
            .rev()
            .map(Record::Book)
            .collect(),
        Entity::BookInstance => renderer
            .copies
            .list_instances(&BookInstanceListQuery {
                status: filters.status,
                due_back: filters.due_back.resolve(today),
                ..BookInstanceListQuery::default()
            })?
            .into_iter()
            .map(Record::Copy)
            .collect(),
    };

    let rows = renderer.rows(&records, &columns)?;
    Ok(ChangeList {
        entity,
        columns,
        rows,
    })
}

/// Existing `child` rows editable inline under one parent record.
///
/// Columns are the child's editable fields minus its foreign key to the parent.
pub fn inline_rows(
    conn: &Connection,
    site: &AdminSite,
    parent: Entity,
    parent_pk: i64,
    child: Entity,
) -> Result<ChangeList, AdminError> {
    let admin = site
        .get(parent)
        .ok_or(AdminConfigError::NotRegistered(parent))?;
    if !admin.inlines.iter().any(|inline| inline.child == child) {
        return Err(AdminError::InlineNotDeclared { parent, child });
    }
    let fk = child
        .foreign_key_to(parent)
        .ok_or(AdminConfigError::InlineWithoutForeignKey { parent, child })?;

    let columns = child
        .editable_fields()
        .filter(|spec| spec.name != fk)
        .map(|spec| Column {
            name: spec.name.to_string(),
            label: spec.label,
        })
        .collect::<Vec<_>>();
    let renderer = CellRenderer::try_new(conn)?;

    let records = match (parent, child) {
        (Entity::Author, Entity::Book) => {
            renderer.require_author(parent_pk)?;
            renderer
                .books
                .list_books(&BookListQuery {
                    author: Some(parent_pk),
                    ..BookListQuery::default()
                })?
                .into_iter()
                .map(Record::Book)
                .collect::<Vec<_>>()
        }
        (Entity::Book, Entity::BookInstance) => {
            renderer.require_book(parent_pk)?;
            renderer
                .copies
                .list_instances(&BookInstanceListQuery {
                    book: Some(parent_pk),
                    ..BookInstanceListQuery::default()
                })?
                .into_iter()
                .map(Record::Copy)
                .collect()
        }
        _ => return Err(AdminError::InlineNotDeclared { parent, child }),
    };

    let rows = renderer.rows(&records, &columns)?;
    Ok(ChangeList {
        entity: child,
        columns,
        rows,
    })
}

fn ensure_filter_allowed(
    admin: &ModelAdmin,
    field: &'static str,
    requested: bool,
) -> Result<(), AdminError> {
    if requested && !admin.list_filter.iter().any(|name| name == field) {
        return Err(AdminError::FilterNotAllowed {
            entity: admin.entity,
            field,
        });
    }
    Ok(())
}

enum Record {
    Genre(Genre),
    Author(Author),
    Book(Book),
    Copy(BookInstance),
}

struct CellRenderer<'conn> {
    genres: SqliteGenreRepository<'conn>,
    authors: SqliteAuthorRepository<'conn>,
    books: SqliteBookRepository<'conn>,
    copies: SqliteBookInstanceRepository<'conn>,
}

impl<'conn> CellRenderer<'conn> {
    fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self {
            genres: SqliteGenreRepository::try_new(conn)?,
            authors: SqliteAuthorRepository::try_new(conn)?,
            books: SqliteBookRepository::try_new(conn)?,
            copies: SqliteBookInstanceRepository::try_new(conn)?,
        })
    }

    fn require_author(&self, id: AuthorId) -> RepoResult<Author> {
        self.authors
            .get_author(id)?
            .ok_or_else(|| RepoError::not_found("author", id))
    }

    fn require_book(&self, id: BookId) -> RepoResult<Book> {
        self.books
            .get_book(id)?
            .ok_or_else(|| RepoError::not_found("book", id))
    }

    fn rows(&self, records: &[Record], columns: &[Column]) -> RepoResult<Vec<ChangeListRow>> {
        records
            .iter()
            .map(|record| {
                let cells = columns
                    .iter()
                    .map(|column| self.cell(record, column.name.as_str()))
                    .collect::<RepoResult<Vec<_>>>()?;
                Ok(ChangeListRow {
                    pk: record_pk(record),
                    cells,
                })
            })
            .collect()
    }

    fn cell(&self, record: &Record, column: &str) -> RepoResult<String> {
        let value = match record {
            Record::Genre(genre) => match column {
                STR_COLUMN => genre.to_string(),
                "id" => genre.id.to_string(),
                "name" => genre.name.clone(),
                _ => String::new(),
            },
            Record::Author(author) => match column {
                STR_COLUMN => author.to_string(),
                "id" => author.id.to_string(),
                "first_name" => author.first_name.clone(),
                "last_name" => author.last_name.clone(),
                "date_of_birth" => date_cell(author.date_of_birth),
                "date_of_death" => date_cell(author.date_of_death),
                _ => String::new(),
            },
            Record::Book(book) => match column {
                STR_COLUMN => book.to_string(),
                "id" => book.id.to_string(),
                "title" => book.title.clone(),
                "summary" => book.summary.clone(),
                "isbn" => book.isbn.clone(),
                "author" => match book.author {
                    Some(id) => self
                        .authors
                        .get_author(id)?
                        .map(|author| author.to_string())
                        .unwrap_or_default(),
                    None => String::new(),
                },
                DISPLAY_GENRE_COLUMN => {
                    let genres = self.books.list_book_genres(book.id)?;
                    display_genre(genres.iter().map(|genre| genre.name.as_str()))
                }
                "genre" => self
                    .books
                    .list_book_genres(book.id)?
                    .iter()
                    .map(|genre| genre.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                _ => String::new(),
            },
            Record::Copy(copy) => match column {
                STR_COLUMN => {
                    let book = match copy.book {
                        Some(id) => self.books.get_book(id)?,
                        None => None,
                    };
                    copy.label(book.as_ref())
                }
                "id" => copy.id.to_string(),
                "imprint" => copy.imprint.clone(),
                "due_back" => date_cell(copy.due_back),
                "status" => copy
                    .status
                    .map(|status| status.label().to_string())
                    .unwrap_or_default(),
                "book" => match copy.book {
                    Some(id) => self
                        .books
                        .get_book(id)?
                        .map(|book| book.to_string())
                        .unwrap_or_default(),
                    None => String::new(),
                },
                _ => String::new(),
            },
        };

        if value.is_empty() && !is_text_column(record, column) {
            return Ok(EMPTY_VALUE_DISPLAY.to_string());
        }
        Ok(value)
    }
}

fn record_pk(record: &Record) -> String {
    match record {
        Record::Genre(genre) => genre.id.to_string(),
        Record::Author(author) => author.id.to_string(),
        Record::Book(book) => book.id.to_string(),
        Record::Copy(copy) => copy.id.to_string(),
    }
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|value| value.to_string()).unwrap_or_default()
}

/// Free-text columns keep empty strings; everything else shows the placeholder.
fn is_text_column(record: &Record, column: &str) -> bool {
    let entity = match record {
        Record::Genre(_) => Entity::Genre,
        Record::Author(_) => Entity::Author,
        Record::Book(_) => Entity::Book,
        Record::Copy(_) => Entity::BookInstance,
    };
    if entity == Entity::Book && column == DISPLAY_GENRE_COLUMN {
        return true;
    }
    matches!(
        entity.field(column).map(|spec| spec.kind),
        Some(FieldKind::Text { .. }) | Some(FieldKind::LongText { .. })
    )
}
