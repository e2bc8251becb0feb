//! Metadata services consulted while criteria contribute to a query.
//!
//! The audit layer never owns entity metadata. It reads it through these
//! traits, which must be safe for concurrent reads.

use crate::config::AuditConfiguration;
use std::fmt;
use std::sync::Arc;

/// Identifier and property layout of audited entities.
pub trait EntityMetadata: Send + Sync {
    /// Identifier property names of `entity_name`; `None` if not audited.
    fn identifier_property_names(&self, entity_name: &str) -> Option<Vec<String>>;

    /// Returns true if `entity_name` has an audited property `property`.
    fn has_property(&self, entity_name: &str, property: &str) -> bool;
}

/// Association from an audited property to another entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDescription {
    /// The entity on the other side.
    pub target_entity: String,
    /// Identifier property of the target entity.
    pub target_id_property: String,
    /// True for to-one associations, whose id is stored with the owner.
    pub to_one: bool,
}

/// Tells relation properties apart from scalar ones.
pub trait RelationChecker: Send + Sync {
    /// Describes the relation `entity_name.property`, if it is one.
    fn relation(&self, entity_name: &str, property: &str) -> Option<RelationDescription>;

    /// Returns true if `entity_name.property` is a relation.
    fn is_relation(&self, entity_name: &str, property: &str) -> bool {
        self.relation(entity_name, property).is_some()
    }
}

/// Historical-data reader a query is built for.
pub trait AuditReader {
    /// Metadata of the entities the reader can query.
    fn entity_metadata(&self) -> &dyn EntityMetadata;
}

/// Audit configuration plus the relation checker, shared by all queries.
#[derive(Clone)]
pub struct AuditService {
    configuration: AuditConfiguration,
    relations: Arc<dyn RelationChecker>,
}

impl AuditService {
    /// Creates a service.
    pub fn new(configuration: AuditConfiguration, relations: Arc<dyn RelationChecker>) -> Self {
        Self {
            configuration,
            relations,
        }
    }

    /// Returns the configuration.
    pub fn configuration(&self) -> &AuditConfiguration {
        &self.configuration
    }

    /// Returns the relation checker.
    pub fn relations(&self) -> &dyn RelationChecker {
        self.relations.as_ref()
    }
}

impl fmt::Debug for AuditService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditService")
            .field("configuration", &self.configuration)
            .finish_non_exhaustive()
    }
}
