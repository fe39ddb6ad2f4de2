//! Field metadata for the four catalog entities.

use std::fmt::{Display, Formatter};

/// Pseudo-column rendering the record's canonical label.
pub const STR_COLUMN: &str = "__str__";
/// Computed Book column rendering the bounded genre list.
pub const DISPLAY_GENRE_COLUMN: &str = "display_genre";

/// Catalog entity addressed by admin configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Entity {
    Genre,
    Author,
    Book,
    BookInstance,
}

/// Storage shape of one field, as seen by form/list consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    AutoId,
    Uuid,
    Text { max_len: usize },
    LongText { max_len: usize },
    Date,
    Choice,
    ForeignKey(Entity),
    ManyToMany(Entity),
}

/// Declarative description of one model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub help_text: &'static str,
    pub kind: FieldKind,
    pub editable: bool,
}

const fn field(
    name: &'static str,
    label: &'static str,
    help_text: &'static str,
    kind: FieldKind,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        help_text,
        kind,
        editable: true,
    }
}

const AUTO_ID: FieldSpec = FieldSpec {
    name: "id",
    label: "ID",
    help_text: "",
    kind: FieldKind::AutoId,
    editable: false,
};

const GENRE_FIELDS: &[FieldSpec] = &[
    AUTO_ID,
    field(
        "name",
        "Name",
        "Enter a book genre (e.g. Science Fiction).",
        FieldKind::Text { max_len: 200 },
    ),
];

const AUTHOR_FIELDS: &[FieldSpec] = &[
    AUTO_ID,
    field("first_name", "First name", "", FieldKind::Text { max_len: 100 }),
    field("last_name", "Last name", "", FieldKind::Text { max_len: 100 }),
    field("date_of_birth", "Date of birth", "", FieldKind::Date),
    field("date_of_death", "Died", "", FieldKind::Date),
];

const BOOK_FIELDS: &[FieldSpec] = &[
    AUTO_ID,
    field("title", "Title", "", FieldKind::Text { max_len: 200 }),
    field("author", "Author", "", FieldKind::ForeignKey(Entity::Author)),
    field(
        "summary",
        "Summary",
        "Enter a brief description of the book.",
        FieldKind::LongText { max_len: 1000 },
    ),
    field(
        "isbn",
        "ISBN",
        "13 character ISBN number.",
        FieldKind::Text { max_len: 13 },
    ),
    field(
        "genre",
        "Genre",
        "Select a genre for this book.",
        FieldKind::ManyToMany(Entity::Genre),
    ),
];

const BOOK_INSTANCE_FIELDS: &[FieldSpec] = &[
    field(
        "id",
        "ID",
        "Unique ID for this particular book across the whole library.",
        FieldKind::Uuid,
    ),
    field("book", "Book", "", FieldKind::ForeignKey(Entity::Book)),
    field("imprint", "Imprint", "", FieldKind::Text { max_len: 200 }),
    field("due_back", "Due back", "", FieldKind::Date),
    field("status", "Status", "Book availability.", FieldKind::Choice),
];

impl Entity {
    pub const ALL: [Entity; 4] = [
        Entity::Genre,
        Entity::Author,
        Entity::Book,
        Entity::BookInstance,
    ];

    /// Lowercase model name used in admin paths.
    pub fn model_name(self) -> &'static str {
        match self {
            Self::Genre => "genre",
            Self::Author => "author",
            Self::Book => "book",
            Self::BookInstance => "bookinstance",
        }
    }

    pub fn verbose_name(self) -> &'static str {
        match self {
            Self::Genre => "genre",
            Self::Author => "author",
            Self::Book => "book",
            Self::BookInstance => "book instance",
        }
    }

    pub fn verbose_name_plural(self) -> &'static str {
        match self {
            Self::Genre => "genres",
            Self::Author => "authors",
            Self::Book => "books",
            Self::BookInstance => "book instances",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Genre => GENRE_FIELDS,
            Self::Author => AUTHOR_FIELDS,
            Self::Book => BOOK_FIELDS,
            Self::BookInstance => BOOK_INSTANCE_FIELDS,
        }
    }

    pub fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|spec| spec.name == name)
    }

    /// Computed (non-stored) list columns available for this entity.
    pub fn computed_columns(self) -> &'static [&'static str] {
        match self {
            Self::Book => &[STR_COLUMN, DISPLAY_GENRE_COLUMN],
            _ => &[STR_COLUMN],
        }
    }

    /// Header label for a stored field or computed column.
    pub fn column_label(self, name: &str) -> Option<&'static str> {
        if name == STR_COLUMN {
            return Some(match self {
                Self::Genre => "Genre",
                Self::Author => "Author",
                Self::Book => "Book",
                Self::BookInstance => "Book instance",
            });
        }
        if self == Self::Book && name == DISPLAY_GENRE_COLUMN {
            return Some("Genre");
        }
        self.field(name).map(|spec| spec.label)
    }

    /// Name of this entity's foreign key pointing at `parent`, if any.
    pub fn foreign_key_to(self, parent: Entity) -> Option<&'static str> {
        self.fields()
            .iter()
            .find(|spec| spec.kind == FieldKind::ForeignKey(parent))
            .map(|spec| spec.name)
    }

    /// Fields shown on a default edit form, in declaration order.
    pub fn editable_fields(self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields().iter().filter(|spec| spec.editable)
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.model_name())
    }
}

#[cfg(test)]
mod tests {
    use super::Entity;

    #[test]
    fn verbose_names_split_compound_model_names() {
        assert_eq!(Entity::BookInstance.model_name(), "bookinstance");
        assert_eq!(Entity::BookInstance.verbose_name(), "book instance");
        assert_eq!(Entity::BookInstance.verbose_name_plural(), "book instances");
        assert_eq!(Entity::Genre.verbose_name_plural(), "genres");
    }
}
