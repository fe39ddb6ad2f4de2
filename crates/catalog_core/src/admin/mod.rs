//! Admin configuration for the catalog entities.
//!
//! # Responsibility
//! - Describe, per entity, list columns, list filters, edit-form layout and
//!   inline-editable children.
//! - Hold those declarations in an explicit [`AdminSite`] value that callers
//!   build and pass to whatever renders browse/edit screens.
//! - Answer change-list and inline queries using the repositories.
//!
//! # Invariants
//! - A [`ModelAdmin`] is validated against entity field metadata before it
//!   can be registered.
//! - There is no process-wide registry.

pub mod changelist;
pub mod entity;
pub mod options;
pub mod site;

pub use changelist::{
    change_list, inline_rows, AdminError, ChangeList, ChangeListFilters, ChangeListRow, Column,
    DateFilter, EMPTY_VALUE_DISPLAY,
};
pub use entity::{Entity, FieldKind, FieldSpec, STR_COLUMN};
pub use options::{AdminConfigError, FieldRow, Fieldset, FormLayout, InlineAdmin, ModelAdmin};
pub use site::AdminSite;
