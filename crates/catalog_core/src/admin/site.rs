//! Explicit admin site holding entity-to-admin bindings.

use super::entity::Entity;
use super::options::{AdminConfigError, FieldRow, Fieldset, InlineAdmin, ModelAdmin};
use log::debug;
use std::collections::BTreeMap;

/// Admin bindings for a set of entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSite {
    entries: BTreeMap<Entity, ModelAdmin>,
}

impl AdminSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog configuration: customized author/book/copy admins, default genre.
    pub fn catalog() -> Result<Self, AdminConfigError> {
        let mut site = Self::new();

        site.register(
            ModelAdmin::new(Entity::Author)
                .with_list_display(&["first_name", "last_name", "date_of_birth", "date_of_death"])
                .with_fields(vec![
                    FieldRow::single("first_name"),
                    FieldRow::single("last_name"),
                    FieldRow::group(["date_of_birth", "date_of_death"]),
                ])
                .with_inline(InlineAdmin::tabular(Entity::Book)),
        )?;

        site.register(
            ModelAdmin::new(Entity::Book)
                .with_list_display(&["title", "author", "display_genre"])
                .with_inline(InlineAdmin::tabular(Entity::BookInstance)),
        )?;

        site.register(
            ModelAdmin::new(Entity::BookInstance)
                .with_list_display(&["book", "status", "due_back", "id"])
                .with_list_filter(&["status", "due_back"])
                .with_fieldsets(vec![
                    Fieldset::untitled(vec![
                        FieldRow::single("book"),
                        FieldRow::single("imprint"),
                        FieldRow::single("id"),
                    ]),
                    Fieldset::titled(
                        "Availability",
                        vec![FieldRow::single("status"), FieldRow::single("due_back")],
                    ),
                ]),
        )?;

        site.register(ModelAdmin::new(Entity::Genre))?;

        Ok(site)
    }

    /// Registers one admin after validating it.
    pub fn register(&mut self, admin: ModelAdmin) -> Result<(), AdminConfigError> {
        admin.validate()?;
        if self.entries.contains_key(&admin.entity) {
            return Err(AdminConfigError::AlreadyRegistered(admin.entity));
        }

        debug!(
            "event=admin_register module=admin status=ok entity={} columns={} inlines={}",
            admin.entity,
            admin.list_display.len(),
            admin.inlines.len()
        );
        self.entries.insert(admin.entity, admin);
        Ok(())
    }

    pub fn unregister(&mut self, entity: Entity) -> Result<ModelAdmin, AdminConfigError> {
        self.entries
            .remove(&entity)
            .ok_or(AdminConfigError::NotRegistered(entity))
    }

    pub fn get(&self, entity: Entity) -> Option<&ModelAdmin> {
        self.entries.get(&entity)
    }

    pub fn is_registered(&self, entity: Entity) -> bool {
        self.entries.contains_key(&entity)
    }

    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::AdminSite;
    use crate::admin::entity::Entity;
    use crate::admin::options::{AdminConfigError, FieldRow, ModelAdmin};

    #[test]
    fn catalog_site_registers_all_four_entities() {
        let site = AdminSite::catalog().expect("catalog admin config is valid");
        assert_eq!(site.len(), 4);
        for entity in Entity::ALL {
            assert!(site.is_registered(entity), "{entity} missing");
        }
    }

    #[test]
    fn author_admin_groups_dates_and_inlines_books() {
        let site = AdminSite::catalog().unwrap();
        let author = site.get(Entity::Author).unwrap();

        let layout = author.form_layout();
        assert_eq!(layout.len(), 1);
        assert_eq!(
            layout[0].rows[2],
            FieldRow::group(["date_of_birth", "date_of_death"])
        );
        assert_eq!(author.inlines.len(), 1);
        assert_eq!(author.inlines[0].child, Entity::Book);
        assert_eq!(author.inlines[0].extra, 0);
    }

    #[test]
    fn book_instance_admin_has_availability_fieldset_and_filters() {
        let site = AdminSite::catalog().unwrap();
        let copies = site.get(Entity::BookInstance).unwrap();

        assert_eq!(copies.list_filter, vec!["status", "due_back"]);
        let layout = copies.form_layout();
        assert_eq!(layout[0].title, None);
        assert_eq!(layout[1].title.as_deref(), Some("Availability"));
        assert_eq!(
            layout[1].rows,
            vec![FieldRow::single("status"), FieldRow::single("due_back")]
        );
    }

    #[test]
    fn register_rejects_duplicates_and_unregister_reports_missing() {
        let mut site = AdminSite::new();
        site.register(ModelAdmin::new(Entity::Genre)).unwrap();
        assert_eq!(
            site.register(ModelAdmin::new(Entity::Genre)).unwrap_err(),
            AdminConfigError::AlreadyRegistered(Entity::Genre)
        );

        site.unregister(Entity::Genre).unwrap();
        assert_eq!(
            site.unregister(Entity::Genre).unwrap_err(),
            AdminConfigError::NotRegistered(Entity::Genre)
        );
    }
}
