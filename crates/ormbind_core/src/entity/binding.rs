//! Frozen entity bindings.

use super::descriptor::Hierarchical;
use crate::collection::{CollectionBinding, CollectionType};
use crate::types::{Caching, CustomSql, InheritanceType, OptimisticLockMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A finalized collection and its resolved runtime type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMapping {
    binding: CollectionBinding,
    collection_type: CollectionType,
}

impl CollectionMapping {
    pub(crate) fn new(binding: CollectionBinding, collection_type: CollectionType) -> Self {
        Self {
            binding,
            collection_type,
        }
    }

    /// Returns the collection binding, keys created.
    pub fn binding(&self) -> &CollectionBinding {
        &self.binding
    }

    /// Returns the resolved collection type.
    pub fn collection_type(&self) -> &CollectionType {
        &self.collection_type
    }
}

/// Immutable, persister-ready binding of one entity.
///
/// Produced only by [`EntityBindingState::build`](super::EntityBindingState::build);
/// safe to share across threads for reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBinding {
    pub(crate) class_name: String,
    pub(crate) jpa_entity_name: Option<String>,
    pub(crate) super_type: Option<Hierarchical>,
    pub(crate) is_root: bool,
    pub(crate) inheritance_type: InheritanceType,
    pub(crate) proxy_interface_name: Option<String>,
    pub(crate) caching: Option<Caching>,
    pub(crate) mutable: bool,
    pub(crate) explicit_polymorphism: bool,
    pub(crate) where_filter: Option<String>,
    pub(crate) row_id: Option<String>,
    pub(crate) dynamic_update: bool,
    pub(crate) dynamic_insert: bool,
    pub(crate) batch_size: i32,
    pub(crate) select_before_update: bool,
    pub(crate) optimistic_lock_mode: OptimisticLockMode,
    pub(crate) persister_class: Option<String>,
    pub(crate) lazy: bool,
    pub(crate) custom_insert: Option<CustomSql>,
    pub(crate) custom_update: Option<CustomSql>,
    pub(crate) custom_delete: Option<CustomSql>,
    pub(crate) synchronized_table_names: BTreeSet<String>,
    pub(crate) collections: Vec<CollectionMapping>,
}

impl EntityBinding {
    /// Returns the class name, which is also the entity name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Returns the JPA entity name, falling back to the class name.
    pub fn jpa_entity_name(&self) -> &str {
        self.jpa_entity_name.as_deref().unwrap_or(&self.class_name)
    }

    /// Returns the super type.
    pub fn super_type(&self) -> Option<&Hierarchical> {
        self.super_type.as_ref()
    }

    /// Returns true for hierarchy roots.
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Returns the inheritance strategy.
    pub fn inheritance_type(&self) -> InheritanceType {
        self.inheritance_type
    }

    /// Returns the proxy interface.
    pub fn proxy_interface_name(&self) -> Option<&str> {
        self.proxy_interface_name.as_deref()
    }

    /// Returns the caching policy.
    pub fn caching(&self) -> Option<&Caching> {
        self.caching.as_ref()
    }

    /// Returns true if instances may be updated.
    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Returns true for explicit polymorphism.
    pub fn is_explicit_polymorphism(&self) -> bool {
        self.explicit_polymorphism
    }

    /// Returns the where filter.
    pub fn where_filter(&self) -> Option<&str> {
        self.where_filter.as_deref()
    }

    /// Returns the row identifier column.
    pub fn row_id(&self) -> Option<&str> {
        self.row_id.as_deref()
    }

    /// Returns true for dynamic updates.
    pub fn is_dynamic_update(&self) -> bool {
        self.dynamic_update
    }

    /// Returns true for dynamic inserts.
    pub fn is_dynamic_insert(&self) -> bool {
        self.dynamic_insert
    }

    /// Returns the configured batch size, if any.
    pub fn batch_size(&self) -> Option<u32> {
        u32::try_from(self.batch_size).ok()
    }

    /// Returns true if a select precedes every update.
    pub fn is_select_before_update(&self) -> bool {
        self.select_before_update
    }

    /// Returns the optimistic lock mode.
    pub fn optimistic_lock_mode(&self) -> OptimisticLockMode {
        self.optimistic_lock_mode
    }

    /// Returns the custom persister class.
    pub fn custom_entity_persister_class(&self) -> Option<&str> {
        self.persister_class.as_deref()
    }

    /// Returns true if the entity is proxied.
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// Returns the custom insert statement.
    pub fn custom_insert(&self) -> Option<&CustomSql> {
        self.custom_insert.as_ref()
    }

    /// Returns the custom update statement.
    pub fn custom_update(&self) -> Option<&CustomSql> {
        self.custom_update.as_ref()
    }

    /// Returns the custom delete statement.
    pub fn custom_delete(&self) -> Option<&CustomSql> {
        self.custom_delete.as_ref()
    }

    /// Returns the synchronized table names.
    pub fn synchronized_table_names(&self) -> &BTreeSet<String> {
        &self.synchronized_table_names
    }

    /// Returns the finalized collections in declaration order.
    pub fn collections(&self) -> &[CollectionMapping] {
        &self.collections
    }

    /// Looks up a collection by role.
    pub fn collection(&self, role: &str) -> Option<&CollectionMapping> {
        self.collections.iter().find(|c| c.binding.role() == role)
    }
}
