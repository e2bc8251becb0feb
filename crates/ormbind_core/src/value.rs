//! Column-backed values: keys, indexes, elements and identifiers.

use crate::config::Config;
use crate::relational::{Column, ForeignKey, Table};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A value mapped onto one or more columns.
///
/// When the value refers to another entity (a many-to-one, or an
/// entity-keyed map index) it carries the referenced entity name and can
/// create the matching foreign key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleValue {
    columns: Vec<Column>,
    type_name: Option<String>,
    foreign_key_target: Option<String>,
}

impl SimpleValue {
    /// Creates a value with no columns bound yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a basic value over the given column names.
    pub fn of_columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: names.into_iter().map(Column::new).collect(),
            ..Self::default()
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn with_column(mut self, column: Column) -> Self {
        self.add_column(column);
        self
    }

    /// Marks the value as a reference to `entity`.
    #[must_use]
    pub fn referencing(mut self, entity: impl Into<String>) -> Self {
        self.foreign_key_target = Some(entity.into());
        self
    }

    /// Sets the persistence type name.
    #[must_use]
    pub fn typed(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Adds a column.
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Returns the bound columns.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns true if at least one column is bound.
    pub fn has_columns(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Returns true if every column accepts NULL.
    pub fn is_nullable(&self) -> bool {
        self.columns.iter().all(|c| c.nullable)
    }

    /// Returns the persistence type name.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Returns the referenced entity, if this value is an association.
    pub fn foreign_key_target(&self) -> Option<&str> {
        self.foreign_key_target.as_deref()
    }

    /// Creates the foreign key implied by this value, if it references an
    /// entity. Basic values create nothing.
    pub fn create_foreign_key<'t>(
        &self,
        table: &'t mut Table,
        config: &Config,
    ) -> Option<&'t ForeignKey> {
        match self.foreign_key_target.as_deref() {
            Some(entity) => Some(self.create_foreign_key_of_entity(entity, table, config)),
            None => {
                trace!(table = table.name(), "basic value, no foreign key");
                None
            }
        }
    }

    /// Creates a foreign key from this value's columns to `entity`.
    pub fn create_foreign_key_of_entity<'t>(
        &self,
        entity: &str,
        table: &'t mut Table,
        config: &Config,
    ) -> &'t ForeignKey {
        trace!(table = table.name(), entity, "creating foreign key");
        table.create_foreign_key(self.columns.clone(), entity, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_value_creates_no_foreign_key() {
        let mut table = Table::new("person_scores");
        let value = SimpleValue::of_columns(["label"]);
        assert!(value.create_foreign_key(&mut table, &Config::default()).is_none());
        assert!(table.foreign_keys().is_empty());
    }

    #[test]
    fn association_creates_foreign_key() {
        let mut table = Table::new("person_pets");
        let value = SimpleValue::of_columns(["pet_id"]).referencing("Pet");
        let fk = value
            .create_foreign_key(&mut table, &Config::default())
            .unwrap();
        assert_eq!(fk.referenced_entity, "Pet");
        assert_eq!(fk.column_names(), vec!["pet_id"]);
    }

    #[test]
    fn nullability_follows_columns() {
        let value = SimpleValue::new()
            .with_column(Column::new("a"))
            .with_column(Column::new("b").not_null());
        assert!(!value.is_nullable());
        assert!(SimpleValue::of_columns(["a"]).is_nullable());
    }
}
