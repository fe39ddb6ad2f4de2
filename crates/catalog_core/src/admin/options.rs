//! Per-entity admin declarations and their validation.

use super::entity::{Entity, FieldKind};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One line of an edit form; a group renders its fields side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRow {
    Single(String),
    Group(Vec<String>),
}

impl FieldRow {
    pub fn single(name: impl Into<String>) -> Self {
        Self::Single(name.into())
    }

    pub fn group<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Group(names.into_iter().map(Into::into).collect())
    }

    pub fn field_names(&self) -> Vec<&str> {
        match self {
            Self::Single(name) => vec![name.as_str()],
            Self::Group(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// Titled (or untitled) group of form rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fieldset {
    pub title: Option<String>,
    pub rows: Vec<FieldRow>,
}

impl Fieldset {
    pub fn untitled(rows: Vec<FieldRow>) -> Self {
        Self { title: None, rows }
    }

    pub fn titled(title: impl Into<String>, rows: Vec<FieldRow>) -> Self {
        Self {
            title: Some(title.into()),
            rows,
        }
    }
}

/// Edit-form layout declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormLayout {
    /// Every editable field, one per row, in declaration order.
    #[default]
    Default,
    Fields(Vec<FieldRow>),
    Fieldsets(Vec<Fieldset>),
}

/// Child entity editable from the parent's edit form, one table row per child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineAdmin {
    pub child: Entity,
    /// Number of blank child forms offered in addition to existing rows.
    pub extra: u32,
}

impl InlineAdmin {
    pub fn tabular(child: Entity) -> Self {
        Self {
            child,
            extra: 0,
        }
    }
}

/// Admin declaration for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAdmin {
    pub entity: Entity,
    pub list_display: Vec<String>,
    pub list_filter: Vec<String>,
    pub form: FormLayout,
    pub inlines: Vec<InlineAdmin>,
}

impl ModelAdmin {
    /// Default presentation: label column, no filters, default form.
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            list_display: vec![super::entity::STR_COLUMN.to_string()],
            list_filter: Vec::new(),
            form: FormLayout::Default,
            inlines: Vec::new(),
        }
    }

    pub fn with_list_display(mut self, columns: &[&str]) -> Self {
        self.list_display = columns.iter().map(|name| (*name).to_string()).collect();
        self
    }

    pub fn with_list_filter(mut self, fields: &[&str]) -> Self {
        self.list_filter = fields.iter().map(|name| (*name).to_string()).collect();
        self
    }

    pub fn with_fields(mut self, rows: Vec<FieldRow>) -> Self {
        self.form = FormLayout::Fields(rows);
        self
    }

    pub fn with_fieldsets(mut self, fieldsets: Vec<Fieldset>) -> Self {
        self.form = FormLayout::Fieldsets(fieldsets);
        self
    }

    pub fn with_inline(mut self, inline: InlineAdmin) -> Self {
        self.inlines.push(inline);
        self
    }

    /// Effective form layout as fieldsets.
    pub fn form_layout(&self) -> Vec<Fieldset> {
        match &self.form {
            FormLayout::Default => vec![Fieldset::untitled(
                self.entity
                    .editable_fields()
                    .map(|spec| FieldRow::single(spec.name))
                    .collect(),
            )],
            FormLayout::Fields(rows) => vec![Fieldset::untitled(rows.clone())],
            FormLayout::Fieldsets(fieldsets) => fieldsets.clone(),
        }
    }

    /// Checks every referenced name against the entity's field metadata.
    pub fn validate(&self) -> Result<(), AdminConfigError> {
        let entity = self.entity;

        if self.list_display.is_empty() {
            return Err(AdminConfigError::EmptyListDisplay(entity));
        }
        for column in &self.list_display {
            if entity.computed_columns().contains(&column.as_str()) {
                continue;
            }
            let spec = entity
                .field(column)
                .ok_or_else(|| AdminConfigError::unknown(entity, "list_display", column))?;
            if matches!(spec.kind, FieldKind::ManyToMany(_)) {
                return Err(AdminConfigError::ManyToManyInListDisplay {
                    entity,
                    field: column.clone(),
                });
            }
        }

        for name in &self.list_filter {
            if entity.field(name).is_none() {
                return Err(AdminConfigError::unknown(entity, "list_filter", name));
            }
        }

        let mut seen = BTreeSet::new();
        for fieldset in self.form_layout() {
            for row in &fieldset.rows {
                for name in row.field_names() {
                    let spec = entity
                        .field(name)
                        .ok_or_else(|| AdminConfigError::unknown(entity, "fields", name))?;
                    if !spec.editable {
                        return Err(AdminConfigError::NotEditable {
                            entity,
                            field: name.to_string(),
                        });
                    }
                    if !seen.insert(name.to_string()) {
                        return Err(AdminConfigError::DuplicateFormField {
                            entity,
                            field: name.to_string(),
                        });
                    }
                }
            }
        }

        for inline in &self.inlines {
            if inline.child.foreign_key_to(entity).is_none() {
                return Err(AdminConfigError::InlineWithoutForeignKey {
                    parent: entity,
                    child: inline.child,
                });
            }
        }

        Ok(())
    }
}

/// Admin declaration or registration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminConfigError {
    UnknownField {
        entity: Entity,
        option: &'static str,
        field: String,
    },
    EmptyListDisplay(Entity),
    ManyToManyInListDisplay {
        entity: Entity,
        field: String,
    },
    NotEditable {
        entity: Entity,
        field: String,
    },
    DuplicateFormField {
        entity: Entity,
        field: String,
    },
    InlineWithoutForeignKey {
        parent: Entity,
        child: Entity,
    },
    AlreadyRegistered(Entity),
    NotRegistered(Entity),
}

impl AdminConfigError {
    fn unknown(entity: Entity, option: &'static str, field: &str) -> Self {
        Self::UnknownField {
            entity,
            option,
            field: field.to_string(),
        }
    }
}

impl Display for AdminConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField {
                entity,
                option,
                field,
            } => write!(f, "{entity}: `{option}` refers to unknown field `{field}`"),
            Self::EmptyListDisplay(entity) => write!(f, "{entity}: list_display is empty"),
            Self::ManyToManyInListDisplay { entity, field } => write!(
                f,
                "{entity}: many-to-many field `{field}` cannot be a list column"
            ),
            Self::NotEditable { entity, field } => {
                write!(f, "{entity}: field `{field}` is not editable")
            }
            Self::DuplicateFormField { entity, field } => {
                write!(f, "{entity}: field `{field}` appears more than once in the form")
            }
            Self::InlineWithoutForeignKey { parent, child } => {
                write!(f, "{child} has no foreign key to {parent}")
            }
            Self::AlreadyRegistered(entity) => write!(f, "{entity} is already registered"),
            Self::NotRegistered(entity) => write!(f, "{entity} is not registered"),
        }
    }
}

impl Error for AdminConfigError {}

#[cfg(test)]
mod tests {
    use super::{AdminConfigError, FieldRow, InlineAdmin, ModelAdmin};
    use crate::admin::entity::Entity;

    #[test]
    fn default_admin_uses_label_column_and_all_editable_fields() {
        let admin = ModelAdmin::new(Entity::Genre);
        admin.validate().unwrap();
        assert_eq!(admin.list_display, vec!["__str__".to_string()]);

        let layout = admin.form_layout();
        assert_eq!(layout.len(), 1);
        assert_eq!(layout[0].rows, vec![FieldRow::single("name")]);
    }

    #[test]
    fn genre_many_to_many_cannot_be_a_list_column() {
        let err = ModelAdmin::new(Entity::Book)
            .with_list_display(&["title", "genre"])
            .validate()
            .unwrap_err();
        assert!(matches!(err, AdminConfigError::ManyToManyInListDisplay { .. }));
    }

    #[test]
    fn duplicate_and_unknown_form_fields_are_rejected() {
        let duplicate = ModelAdmin::new(Entity::Author)
            .with_fields(vec![
                FieldRow::single("first_name"),
                FieldRow::group(["first_name", "last_name"]),
            ])
            .validate()
            .unwrap_err();
        assert!(matches!(duplicate, AdminConfigError::DuplicateFormField { .. }));

        let unknown = ModelAdmin::new(Entity::Author)
            .with_list_filter(&["nickname"])
            .validate()
            .unwrap_err();
        assert!(matches!(
            unknown,
            AdminConfigError::UnknownField { option: "list_filter", .. }
        ));
    }

    #[test]
    fn inline_requires_foreign_key_to_parent() {
        let err = ModelAdmin::new(Entity::Author)
            .with_inline(InlineAdmin::tabular(Entity::BookInstance))
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            AdminConfigError::InlineWithoutForeignKey {
                parent: Entity::Author,
                child: Entity::BookInstance,
            }
        );
    }
}
