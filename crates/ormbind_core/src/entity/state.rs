//! Mutable entity binding state.

use super::binding::{CollectionMapping, EntityBinding};
use super::descriptor::{EntityDescriptor, Hierarchical};
use crate::collection::{CollectionBinding, TypeResolver};
use crate::config::Config;
use crate::error::{MappingError, MappingResult};
use crate::types::{
    Caching, CustomSql, EntityMode, InheritanceType, OptimisticLockMode, OptimisticLockType,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Batch size of an entity that never configured one.
///
/// Distinct from 0, which disables batching.
pub const UNSET_BATCH_SIZE: i32 = -1;

/// Meta attributes attached to a mapping, by name.
pub type MetaAttributes = BTreeMap<String, Vec<String>>;

/// Everything a front-end learns about one entity during a binding pass.
///
/// Class name, super type, root flag and inheritance strategy come from the
/// class descriptor and never change. Every other facet has a setter for the
/// front-end and a getter for the finalization step, which consumes the
/// state with [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct EntityBindingState {
    class_name: String,
    super_type: Option<Hierarchical>,
    is_root: bool,
    inheritance_type: InheritanceType,

    jpa_entity_name: Option<String>,
    proxy_interface_name: Option<String>,
    caching: Option<Caching>,
    mutable: bool,
    explicit_polymorphism: bool,
    where_filter: Option<String>,
    row_id: Option<String>,
    dynamic_update: bool,
    dynamic_insert: bool,
    batch_size: i32,
    select_before_update: bool,
    optimistic_lock: Option<OptimisticLockType>,
    persister_class: Option<String>,
    lazy: bool,
    custom_insert: Option<CustomSql>,
    custom_update: Option<CustomSql>,
    custom_delete: Option<CustomSql>,
    synchronized_table_names: BTreeSet<String>,
    collections: Vec<CollectionBinding>,
}

impl EntityBindingState {
    /// Starts the binding of `class`, whose super type is `super_type`.
    pub fn new<D: EntityDescriptor + ?Sized>(super_type: Option<Hierarchical>, class: &D) -> Self {
        Self {
            class_name: class.class_name().to_string(),
            super_type,
            is_root: class.is_root(),
            inheritance_type: class.inheritance_type(),
            jpa_entity_name: None,
            proxy_interface_name: None,
            caching: None,
            mutable: false,
            explicit_polymorphism: false,
            where_filter: None,
            row_id: None,
            dynamic_update: false,
            dynamic_insert: false,
            batch_size: UNSET_BATCH_SIZE,
            select_before_update: false,
            optimistic_lock: None,
            persister_class: None,
            lazy: false,
            custom_insert: None,
            custom_update: None,
            custom_delete: None,
            synchronized_table_names: BTreeSet::new(),
            collections: Vec::new(),
        }
    }

    // ---- fixed at construction ----

    /// Returns the class name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Returns the entity name, which is the class name.
    pub fn entity_name(&self) -> &str {
        &self.class_name
    }

    /// Returns the super type; `None` at the top of a hierarchy.
    pub fn super_type(&self) -> Option<&Hierarchical> {
        self.super_type.as_ref()
    }

    /// Returns true if the entity is the root of its hierarchy.
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Returns the inheritance strategy.
    pub fn inheritance_type(&self) -> InheritanceType {
        self.inheritance_type
    }

    /// Entities are always plain objects.
    pub fn entity_mode(&self) -> EntityMode {
        EntityMode::Pojo
    }

    /// Custom tuplizers are not supported.
    pub fn custom_entity_tuplizer_class(&self) -> Option<&str> {
        None
    }

    /// Meta attributes are not supported.
    pub fn meta_attribute_context(&self) -> Option<&MetaAttributes> {
        None
    }

    /// There is no way to declare an abstract entity.
    pub fn is_abstract(&self) -> bool {
        false
    }

    // ---- setters ----

    /// Sets the JPA entity name.
    pub fn set_jpa_entity_name(&mut self, name: impl Into<String>) {
        self.jpa_entity_name = Some(name.into());
    }

    /// Sets the proxy interface.
    pub fn set_proxy_interface_name(&mut self, name: impl Into<String>) {
        self.proxy_interface_name = Some(name.into());
    }

    /// Sets the caching policy.
    pub fn set_caching(&mut self, caching: Caching) {
        self.caching = Some(caching);
    }

    /// Sets mutability.
    pub fn set_mutable(&mut self, mutable: bool) {
        self.mutable = mutable;
    }

    /// Sets explicit polymorphism.
    pub fn set_explicit_polymorphism(&mut self, explicit: bool) {
        self.explicit_polymorphism = explicit;
    }

    /// Sets the where filter.
    pub fn set_where_filter(&mut self, filter: impl Into<String>) {
        self.where_filter = Some(filter.into());
    }

    /// Sets the row identifier column.
    pub fn set_row_id(&mut self, row_id: impl Into<String>) {
        self.row_id = Some(row_id.into());
    }

    /// Sets dynamic update.
    pub fn set_dynamic_update(&mut self, dynamic: bool) {
        self.dynamic_update = dynamic;
    }

    /// Sets dynamic insert.
    pub fn set_dynamic_insert(&mut self, dynamic: bool) {
        self.dynamic_insert = dynamic;
    }

    /// Sets the batch size.
    pub fn set_batch_size(&mut self, batch_size: i32) {
        self.batch_size = batch_size;
    }

    /// Sets select-before-update.
    pub fn set_select_before_update(&mut self, select: bool) {
        self.select_before_update = select;
    }

    /// Sets the optimistic lock type.
    pub fn set_optimistic_lock(&mut self, lock: OptimisticLockType) {
        self.optimistic_lock = Some(lock);
    }

    /// Sets the custom persister class.
    pub fn set_persister_class(&mut self, class: impl Into<String>) {
        self.persister_class = Some(class.into());
    }

    /// Sets laziness.
    pub fn set_lazy(&mut self, lazy: bool) {
        self.lazy = lazy;
    }

    /// Sets the custom insert statement.
    pub fn set_custom_insert(&mut self, sql: CustomSql) {
        self.custom_insert = Some(sql);
    }

    /// Sets the custom update statement.
    pub fn set_custom_update(&mut self, sql: CustomSql) {
        self.custom_update = Some(sql);
    }

    /// Sets the custom delete statement.
    pub fn set_custom_delete(&mut self, sql: CustomSql) {
        self.custom_delete = Some(sql);
    }

    /// Adds a table whose changes invalidate this entity. Duplicates collapse.
    pub fn add_synchronized_table_name(&mut self, table: impl Into<String>) {
        self.synchronized_table_names.insert(table.into());
    }

    /// Attaches a collection-valued property.
    pub fn add_collection(&mut self, collection: CollectionBinding) {
        self.collections.push(collection);
    }

    // ---- getters ----

    /// Returns the JPA entity name.
    pub fn jpa_entity_name(&self) -> Option<&str> {
        self.jpa_entity_name.as_deref()
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

    /// Returns true if the entity is only returned by queries naming it.
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

    /// Returns true if updates only write changed columns.
    pub fn is_dynamic_update(&self) -> bool {
        self.dynamic_update
    }

    /// Returns true if inserts only write non-null columns.
    pub fn is_dynamic_insert(&self) -> bool {
        self.dynamic_insert
    }

    /// Returns the batch size, [`UNSET_BATCH_SIZE`] if never set.
    pub fn batch_size(&self) -> i32 {
        self.batch_size
    }

    /// Returns true if a select precedes every update.
    pub fn is_select_before_update(&self) -> bool {
        self.select_before_update
    }

    /// Returns the declared optimistic lock type.
    pub fn optimistic_lock(&self) -> Option<OptimisticLockType> {
        self.optimistic_lock
    }

    /// Maps the optimistic lock type to its numeric mode.
    ///
    /// # Panics
    ///
    /// Panics if no lock type was set. Front-ends always set one, so this is
    /// a defect in the caller, not a mapping error.
    pub fn optimistic_lock_mode(&self) -> OptimisticLockMode {
        match self.optimistic_lock {
            Some(OptimisticLockType::All) => OptimisticLockMode::ALL,
            Some(OptimisticLockType::None) => OptimisticLockMode::NONE,
            Some(OptimisticLockType::Dirty) => OptimisticLockMode::DIRTY,
            Some(OptimisticLockType::Version) => OptimisticLockMode::VERSION,
            None => panic!(
                "unexpected optimistic lock type: None (entity {})",
                self.class_name
            ),
        }
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

    /// Returns the attached collections.
    pub fn collections(&self) -> &[CollectionBinding] {
        &self.collections
    }

    // ---- finalization ----

    /// Freezes the state into an immutable [`EntityBinding`].
    ///
    /// Resolves every collection's type and creates its keys exactly once.
    /// On error the state is gone and nothing escapes.
    ///
    /// # Panics
    ///
    /// Panics if no optimistic lock type was set.
    pub fn build(
        self,
        config: &Config,
        resolver: &dyn TypeResolver,
    ) -> MappingResult<EntityBinding> {
        self.validate()?;
        let optimistic_lock_mode = self.optimistic_lock_mode();

        let mut collections = Vec::with_capacity(self.collections.len());
        for mut binding in self.collections {
            if binding.owner_entity_name() != self.class_name {
                return Err(MappingError::invalid_entity_state(
                    &self.class_name,
                    format!(
                        "collection {} belongs to {}",
                        binding.role(),
                        binding.owner_entity_name()
                    ),
                ));
            }
            let collection_type = binding.collection_type(resolver);
            binding.create_all_keys(config)?;
            collections.push(CollectionMapping::new(binding, collection_type));
        }

        debug!(
            entity = self.class_name.as_str(),
            collections = collections.len(),
            lock_mode = %optimistic_lock_mode,
            "entity binding frozen"
        );

        Ok(EntityBinding {
            class_name: self.class_name,
            jpa_entity_name: self.jpa_entity_name,
            super_type: self.super_type,
            is_root: self.is_root,
            inheritance_type: self.inheritance_type,
            proxy_interface_name: self.proxy_interface_name,
            caching: self.caching,
            mutable: self.mutable,
            explicit_polymorphism: self.explicit_polymorphism,
            where_filter: self.where_filter,
            row_id: self.row_id,
            dynamic_update: self.dynamic_update,
            dynamic_insert: self.dynamic_insert,
            batch_size: self.batch_size,
            select_before_update: self.select_before_update,
            optimistic_lock_mode,
            persister_class: self.persister_class,
            lazy: self.lazy,
            custom_insert: self.custom_insert,
            custom_update: self.custom_update,
            custom_delete: self.custom_delete,
            synchronized_table_names: self.synchronized_table_names,
            collections,
        })
    }

    fn validate(&self) -> MappingResult<()> {
        let invalid = |message: &str| MappingError::invalid_entity_state(&self.class_name, message);

        if self.batch_size < UNSET_BATCH_SIZE {
            return Err(invalid("batch size must be -1 (unset) or non-negative"));
        }
        if is_blank(self.jpa_entity_name.as_deref()) {
            return Err(invalid("JPA entity name is blank"));
        }
        if is_blank(self.row_id.as_deref()) {
            return Err(invalid("row id column is blank"));
        }
        let custom = [&self.custom_insert, &self.custom_update, &self.custom_delete];
        if custom
            .iter()
            .any(|sql| is_blank(sql.as_ref().map(|s| s.sql.as_str())))
        {
            return Err(invalid("custom SQL statement is blank"));
        }
        if self.synchronized_table_names.iter().any(|t| t.trim().is_empty()) {
            return Err(invalid("synchronized table name is blank"));
        }
        Ok(())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{CollectionTypeKind, Element, TypeFactory};
    use crate::entity::EntityClass;
    use crate::relational::Table;
    use crate::value::SimpleValue;

    fn person() -> EntityBindingState {
        EntityBindingState::new(None, &EntityClass::root("Person"))
    }

    #[test]
    fn construction_facets() {
        let state = person();
        assert_eq!(state.class_name(), "Person");
        assert_eq!(state.entity_name(), "Person");
        assert!(state.super_type().is_none());
        assert!(state.is_root());
        assert_eq!(state.entity_mode(), EntityMode::Pojo);
        assert!(state.custom_entity_tuplizer_class().is_none());
        assert!(state.meta_attribute_context().is_none());
        assert!(!state.is_abstract());
    }

    #[test]
    fn batch_size_sentinel() {
        let mut state = person();
        assert_eq!(state.batch_size(), UNSET_BATCH_SIZE);
        state.set_batch_size(0);
        assert_eq!(state.batch_size(), 0);
        state.set_batch_size(5);
        assert_eq!(state.batch_size(), 5);
    }

    #[test]
    fn synchronized_tables_are_a_set() {
        let mut state = person();
        state.add_synchronized_table_name("T1");
        state.add_synchronized_table_name("T1");
        state.add_synchronized_table_name("T2");
        assert_eq!(state.synchronized_table_names().len(), 2);
    }

    #[test]
    fn lock_modes() {
        let mut state = person();
        let cases = [
            (OptimisticLockType::All, OptimisticLockMode::ALL),
            (OptimisticLockType::None, OptimisticLockMode::NONE),
            (OptimisticLockType::Dirty, OptimisticLockMode::DIRTY),
            (OptimisticLockType::Version, OptimisticLockMode::VERSION),
        ];
        for (lock, mode) in cases {
            state.set_optimistic_lock(lock);
            assert_eq!(state.optimistic_lock_mode(), mode);
        }
    }

    #[test]
    #[should_panic(expected = "unexpected optimistic lock type")]
    fn unset_lock_mode_panics() {
        person().optimistic_lock_mode();
    }

    #[test]
    fn build_rejects_bad_batch_size() {
        let mut state = person();
        state.set_optimistic_lock(OptimisticLockType::Version);
        state.set_batch_size(-2);
        let err = state.build(&Config::default(), &TypeFactory).unwrap_err();
        assert!(matches!(err, MappingError::InvalidEntityState { .. }));
    }

    #[test]
    fn build_rejects_foreign_collection() {
        let mut state = person();
        state.set_optimistic_lock(OptimisticLockType::Version);
        state.add_collection(CollectionBinding::set("Pet", "toys"));
        assert!(state.build(&Config::default(), &TypeFactory).is_err());
    }

    #[test]
    fn build_freezes_collections() {
        let mut state = person();
        state.set_optimistic_lock(OptimisticLockType::Dirty);
        state.set_dynamic_update(true);

        let mut tags = CollectionBinding::set("Person", "tags");
        tags.set_key(SimpleValue::of_columns(["person_id"]));
        tags.set_element(Element::Value(SimpleValue::of_columns(["tag"])));
        tags.set_collection_table(Table::new("person_tags"));
        state.add_collection(tags);

        let binding = state.build(&Config::default(), &TypeFactory).unwrap();
        assert_eq!(binding.optimistic_lock_mode(), OptimisticLockMode::DIRTY);
        assert!(binding.is_dynamic_update());
        assert_eq!(binding.collections().len(), 1);
        let mapping = &binding.collections()[0];
        assert_eq!(mapping.collection_type().kind, CollectionTypeKind::Set);
        assert_eq!(
            mapping.binding().collection_table().unwrap().foreign_keys().len(),
            1
        );
    }

    #[test]
    fn build_propagates_collection_errors() {
        let mut state = person();
        state.set_optimistic_lock(OptimisticLockType::Version);
        state.add_collection(CollectionBinding::map("Person", "scores"));
        assert_eq!(
            state.build(&Config::default(), &TypeFactory).unwrap_err(),
            MappingError::missing_collection_table("Person.scores")
        );
    }
}
