//! Relational model: tables, columns and key constraints.
//!
//! Bindings only ever add constraints to a [`Table`]; nothing here emits
//! DDL. Constraint names are derived deterministically from the table name
//! and the (sorted) column names so that two bindings describing the same
//! constraint agree on its name.

use crate::config::Config;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A mapped column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Explicit SQL type, when the mapping declares one.
    pub sql_type: Option<String>,
}

impl Column {
    /// Creates a nullable column without an explicit SQL type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: true,
            sql_type: None,
        }
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the explicit SQL type.
    #[must_use]
    pub fn sql_type(mut self, sql_type: impl Into<String>) -> Self {
        self.sql_type = Some(sql_type.into());
        self
    }
}

/// Primary key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    /// Constraint name.
    pub name: String,
    /// Constrained columns, in key order.
    pub columns: Vec<Column>,
}

/// Foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Referencing columns.
    pub columns: Vec<Column>,
    /// Entity whose primary key is referenced.
    pub referenced_entity: String,
}

impl ForeignKey {
    /// Returns the referencing column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// A mapped table and the constraints bindings attached to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    primary_key: Option<PrimaryKey>,
    foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Creates an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a column unless one with the same name exists.
    pub fn add_column(&mut self, column: Column) {
        if !self.columns.iter().any(|c| c.name == column.name) {
            self.columns.push(column);
        }
    }

    /// Returns the columns.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the primary key, if one was created.
    pub fn primary_key(&self) -> Option<&PrimaryKey> {
        self.primary_key.as_ref()
    }

    /// Returns the foreign keys in creation order.
    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Creates the primary key over `columns`, replacing any previous one.
    pub fn create_primary_key(&mut self, columns: Vec<Column>, config: &Config) -> &PrimaryKey {
        for column in &columns {
            self.add_column(column.clone());
        }
        let name = constraint_name(&config.primary_key_prefix, &self.name, &columns, config);
        self.primary_key.insert(PrimaryKey { name, columns })
    }

    /// Creates a foreign key from `columns` to `referenced_entity`.
    ///
    /// A foreign key over the same columns to the same entity is returned
    /// as-is instead of being added twice.
    pub fn create_foreign_key(
        &mut self,
        columns: Vec<Column>,
        referenced_entity: &str,
        config: &Config,
    ) -> &ForeignKey {
        let existing = self.foreign_keys.iter().position(|fk| {
            fk.referenced_entity == referenced_entity && fk.columns == columns
        });
        let index = match existing {
            Some(index) => index,
            None => {
                for column in &columns {
                    self.add_column(column.clone());
                }
                let name =
                    constraint_name(&config.foreign_key_prefix, &self.name, &columns, config);
                self.foreign_keys.push(ForeignKey {
                    name,
                    columns,
                    referenced_entity: referenced_entity.to_string(),
                });
                self.foreign_keys.len() - 1
            }
        };
        &self.foreign_keys[index]
    }
}

/// Derives a constraint name from a table and its columns.
///
/// Column order does not affect the result.
pub fn constraint_name(prefix: &str, table: &str, columns: &[Column], config: &Config) -> String {
    let mut names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    names.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(b"table`");
    hasher.update(table.as_bytes());
    hasher.update(b"`");
    for name in names {
        hasher.update(b"column`");
        hasher.update(name.as_bytes());
        hasher.update(b"`");
    }
    let hex: String = hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();
    let len = config.constraint_hash_length.min(hex.len());
    format!("{prefix}{}", &hex[..len])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cols(names: &[&str]) -> Vec<Column> {
        names.iter().map(|n| Column::new(*n)).collect()
    }

    #[test]
    fn constraint_name_ignores_column_order() {
        let config = Config::default();
        let a = constraint_name("FK", "t", &cols(&["a", "b"]), &config);
        let b = constraint_name("FK", "t", &cols(&["b", "a"]), &config);
        assert_eq!(a, b);
        assert!(a.starts_with("FK"));
        assert_eq!(a.len(), 2 + 25);
    }

    #[test]
    fn constraint_name_depends_on_table() {
        let config = Config::default();
        let a = constraint_name("FK", "t1", &cols(&["a"]), &config);
        let b = constraint_name("FK", "t2", &cols(&["a"]), &config);
        assert_ne!(a, b);
    }

    #[test]
    fn duplicate_foreign_key_is_reused() {
        let config = Config::default();
        let mut table = Table::new("person_tags");
        table.create_foreign_key(cols(&["person_id"]), "Person", &config);
        table.create_foreign_key(cols(&["person_id"]), "Person", &config);
        table.create_foreign_key(cols(&["tag_id"]), "Tag", &config);
        assert_eq!(table.foreign_keys().len(), 2);
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn primary_key_registers_columns() {
        let config = Config::default();
        let mut table = Table::new("person_tags");
        let pk = table.create_primary_key(cols(&["person_id", "tag"]), &config);
        assert!(pk.name.starts_with("PK"));
        assert_eq!(table.columns().len(), 2);
    }

    proptest! {
        #[test]
        fn constraint_name_is_a_function_of_the_column_set(
            table in "[a-z]{1,12}",
            mut names in prop::collection::vec("[a-z]{1,8}", 1..6),
            hash_length in 0usize..80,
        ) {
            let config = Config::default().constraint_hash_length(hash_length);
            let columns: Vec<Column> = names.iter().map(Column::new).collect();
            let forward = constraint_name("FK", &table, &columns, &config);

            names.reverse();
            let reversed: Vec<Column> = names.iter().map(Column::new).collect();
            prop_assert_eq!(
                &forward,
                &constraint_name("FK", &table, &reversed, &config)
            );
            prop_assert_eq!(forward.len(), 2 + hash_length.min(64));
        }
    }
}
