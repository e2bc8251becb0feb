//! Small metadata catalog for unit tests.

use crate::config::AuditConfiguration;
use crate::metadata::{
    AuditReader, AuditService, EntityMetadata, RelationChecker, RelationDescription,
};
use crate::query::{Connective, Parameters, QueryBuilder};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub(crate) struct Catalog {
    ids: HashMap<String, Vec<String>>,
    properties: HashMap<String, Vec<String>>,
    relations: HashMap<(String, String), RelationDescription>,
}

impl EntityMetadata for Catalog {
    fn identifier_property_names(&self, entity_name: &str) -> Option<Vec<String>> {
        self.ids.get(entity_name).cloned()
    }

    fn has_property(&self, entity_name: &str, property: &str) -> bool {
        self.properties
            .get(entity_name)
            .is_some_and(|p| p.iter().any(|n| n == property))
    }
}

impl RelationChecker for Catalog {
    fn relation(&self, entity_name: &str, property: &str) -> Option<RelationDescription> {
        self.relations
            .get(&(entity_name.to_string(), property.to_string()))
            .cloned()
    }
}

impl AuditReader for Catalog {
    fn entity_metadata(&self) -> &dyn EntityMetadata {
        self
    }
}

/// Person(id; name, age, manager -> Person, friends -> Person*).
pub(crate) fn person_catalog() -> Arc<Catalog> {
    let mut catalog = Catalog::default();
    catalog.ids.insert("Person".into(), vec!["id".into()]);
    catalog.properties.insert(
        "Person".into(),
        ["name", "age", "manager", "friends"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    catalog.relations.insert(
        ("Person".into(), "manager".into()),
        RelationDescription {
            target_entity: "Person".into(),
            target_id_property: "id".into(),
            to_one: true,
        },
    );
    catalog.relations.insert(
        ("Person".into(), "friends".into()),
        RelationDescription {
            target_entity: "Person".into(),
            target_id_property: "id".into(),
            to_one: false,
        },
    );
    Arc::new(catalog)
}

pub(crate) fn service(catalog: &Arc<Catalog>) -> AuditService {
    AuditService::new(AuditConfiguration::default(), catalog.clone())
}

pub(crate) fn query() -> (QueryBuilder, Parameters) {
    (
        QueryBuilder::new("Person_AUD", "e"),
        Parameters::new("e", Connective::And),
    )
}
