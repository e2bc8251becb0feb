//! In-memory entity metadata for audit queries.

use ormbind_audit::{AuditReader, EntityMetadata, RelationChecker, RelationDescription};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct AuditedEntity {
    ids: Vec<String>,
    properties: Vec<String>,
    relations: HashMap<String, RelationDescription>,
}

/// Entity metadata, relation checker and reader backed by maps.
///
/// Entities can be registered while other threads read.
#[derive(Debug, Default)]
pub struct InMemoryMetadata {
    entities: RwLock<HashMap<String, AuditedEntity>>,
}

impl InMemoryMetadata {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an audited entity with its identifier properties.
    pub fn add_entity<I, S>(&self, entity: &str, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entities = self.entities.write();
        let e = entities.entry(entity.to_string()).or_default();
        e.ids = ids.into_iter().map(Into::into).collect();
    }

    /// Registers a scalar property.
    pub fn add_property(&self, entity: &str, property: &str) {
        let mut entities = self.entities.write();
        let e = entities.entry(entity.to_string()).or_default();
        if !e.properties.iter().any(|p| p == property) {
            e.properties.push(property.to_string());
        }
    }

    /// Registers a relation property.
    pub fn add_relation(
        &self,
        entity: &str,
        property: &str,
        target_entity: &str,
        target_id_property: &str,
        to_one: bool,
    ) {
        self.add_property(entity, property);
        let mut entities = self.entities.write();
        let e = entities.entry(entity.to_string()).or_default();
        e.relations.insert(
            property.to_string(),
            RelationDescription {
                target_entity: target_entity.to_string(),
                target_id_property: target_id_property.to_string(),
                to_one,
            },
        );
    }

    /// Number of registered entities.
    pub fn entity_count(&self) -> usize {
        self.entities.read().len()
    }
}

impl EntityMetadata for InMemoryMetadata {
    fn identifier_property_names(&self, entity_name: &str) -> Option<Vec<String>> {
        self.entities.read().get(entity_name).map(|e| e.ids.clone())
    }

    fn has_property(&self, entity_name: &str, property: &str) -> bool {
        self.entities
            .read()
            .get(entity_name)
            .is_some_and(|e| e.properties.iter().any(|p| p == property))
    }
}

impl RelationChecker for InMemoryMetadata {
    fn relation(&self, entity_name: &str, property: &str) -> Option<RelationDescription> {
        self.entities
            .read()
            .get(entity_name)
            .and_then(|e| e.relations.get(property).cloned())
    }
}

impl AuditReader for InMemoryMetadata {
    fn entity_metadata(&self) -> &dyn EntityMetadata {
        self
    }
}
