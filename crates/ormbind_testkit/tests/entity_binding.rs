//! Integration tests for entity binding state and the frozen binding.

use ormbind_core::{
    AccessType, Caching, CollectionBinding, CollectionTypeKind, Config, CustomSql, EntityBinding,
    EntityBindingState, EntityClass, Hierarchical, InheritanceType, MappingError,
    OptimisticLockMode, OptimisticLockType, Table, UNSET_BATCH_SIZE,
};
use ormbind_testkit::prelude::*;
use proptest::prelude::*;
use std::collections::HashSet;

fn expected_mode(lock: OptimisticLockType) -> OptimisticLockMode {
    match lock {
        OptimisticLockType::All => OptimisticLockMode::ALL,
        OptimisticLockType::None => OptimisticLockMode::NONE,
        OptimisticLockType::Dirty => OptimisticLockMode::DIRTY,
        OptimisticLockType::Version => OptimisticLockMode::VERSION,
    }
}

proptest! {
    #[test]
    fn lock_mode_matches_lock_type(lock in lock_type_strategy()) {
        let mut state = EntityBindingState::new(None, &person_class());
        state.set_optimistic_lock(lock);
        prop_assert_eq!(state.optimistic_lock_mode(), expected_mode(lock));
    }

    #[test]
    fn batch_size_survives_build(batch_size in batch_size_strategy()) {
        let mut state = EntityBindingState::new(None, &person_class());
        state.set_optimistic_lock(OptimisticLockType::None);
        state.set_batch_size(batch_size);
        prop_assert_eq!(state.batch_size(), batch_size);

        let binding = state.build(&Config::default(), &TypeFactory).unwrap();
        prop_assert_eq!(binding.batch_size(), u32::try_from(batch_size).ok());
    }

    #[test]
    fn synchronized_tables_are_a_set(names in prop::collection::vec(table_name_strategy(), 0..12)) {
        let mut state = EntityBindingState::new(None, &person_class());
        for name in &names {
            state.add_synchronized_table_name(name.as_str());
            state.add_synchronized_table_name(name.as_str());
        }
        let distinct: HashSet<&String> = names.iter().collect();
        prop_assert_eq!(state.synchronized_table_names().len(), distinct.len());
    }

    #[test]
    fn root_and_super_type_are_fixed(
        lock in lock_type_strategy(),
        batch_size in batch_size_strategy(),
        filter in identifier_strategy(),
    ) {
        let mut state = EntityBindingState::new(None, &person_class());
        state.set_optimistic_lock(lock);
        state.set_batch_size(batch_size);
        state.set_where_filter(filter);
        state.set_dynamic_update(true);
        state.set_lazy(false);

        prop_assert!(state.super_type().is_none());
        prop_assert!(state.is_root());
    }
}

#[test]
fn lock_modes_are_distinct() {
    let modes: HashSet<OptimisticLockMode> = [
        OptimisticLockType::All,
        OptimisticLockType::None,
        OptimisticLockType::Dirty,
        OptimisticLockType::Version,
    ]
    .into_iter()
    .map(expected_mode)
    .collect();
    assert_eq!(modes.len(), 4);
}

#[test]
#[should_panic(expected = "unexpected optimistic lock type")]
fn unset_lock_type_panics() {
    let state = EntityBindingState::new(None, &person_class());
    let _ = state.optimistic_lock_mode();
}

#[test]
fn batch_size_defaults_to_unset() {
    let mut state = EntityBindingState::new(None, &person_class());
    assert_eq!(state.batch_size(), UNSET_BATCH_SIZE);
    state.set_batch_size(5);
    assert_eq!(state.batch_size(), 5);
}

#[test]
fn subclass_keeps_hierarchy() {
    let class = EntityClass::in_hierarchy("Employee", false, InheritanceType::Joined);
    let state = EntityBindingState::new(Some(Hierarchical::new(PERSON)), &class);

    assert!(!state.is_root());
    assert_eq!(state.super_type().map(Hierarchical::name), Some(PERSON));
    assert_eq!(state.inheritance_type(), InheritanceType::Joined);
    assert_eq!(state.entity_name(), "Employee");
    assert!(state.custom_entity_tuplizer_class().is_none());
    assert!(state.meta_attribute_context().is_none());
    assert!(!state.is_abstract());
}

#[test]
fn person_builds_with_all_collections() {
    init_test_logging();
    let resolver = RecordingTypeResolver::new();
    let mut state = person_state();
    state.set_caching(Caching::new("people", AccessType::ReadWrite));
    state.set_custom_insert(CustomSql::new("insert into person values (?, ?)"));

    let binding = state.build(&Config::default(), &resolver).unwrap();

    assert_eq!(binding.class_name(), PERSON);
    assert_eq!(binding.jpa_entity_name(), PERSON);
    assert_eq!(binding.optimistic_lock_mode(), OptimisticLockMode::VERSION);
    assert_eq!(binding.batch_size(), None);
    assert_eq!(binding.collections().len(), 5);
    assert_eq!(
        resolver.kinds(),
        vec![
            CollectionTypeKind::Map,
            CollectionTypeKind::Map,
            CollectionTypeKind::SortedSet,
            CollectionTypeKind::List,
            CollectionTypeKind::Bag,
        ]
    );

    let tags = binding.collection("Person.tags").unwrap();
    let pk = tags.binding().collection_table().unwrap().primary_key().unwrap();
    assert_eq!(pk.columns.len(), 2);
    assert!(binding.collection("Person.missing").is_none());
}

#[test]
fn foreign_collection_is_rejected() {
    let mut state = EntityBindingState::new(None, &EntityClass::root("Order"));
    state.set_optimistic_lock(OptimisticLockType::All);
    state.add_collection(nickname_map());

    let err = state.build(&Config::default(), &TypeFactory).unwrap_err();
    assert!(matches!(err, MappingError::InvalidEntityState { .. }));
}

#[test]
fn unbound_collection_fails_build() {
    let mut state = person_state();
    let mut broken = CollectionBinding::map(PERSON, "broken");
    broken.set_collection_table(Table::new("broken"));
    state.add_collection(broken);

    assert_eq!(
        state.build(&Config::default(), &TypeFactory).unwrap_err(),
        MappingError::missing_key_columns("Person.broken")
    );
}

#[test]
fn frozen_binding_serializes() {
    let binding = person_state().build(&Config::default(), &TypeFactory).unwrap();

    let json = serde_json::to_string(&binding).unwrap();
    let back: EntityBinding = serde_json::from_str(&json).unwrap();
    assert_eq!(back, binding);

    let value: serde_json::Value = serde_json::to_value(&binding).unwrap();
    assert_eq!(value["class_name"], "Person");
    assert_eq!(value["optimistic_lock_mode"], 0);
    assert_eq!(value["synchronized_table_names"], serde_json::json!(["person"]));
}

#[test]
fn config_reads_partial_json() {
    let config: Config = serde_json::from_str(r#"{ "foreign_key_prefix": "fk_" }"#).unwrap();
    assert_eq!(config.foreign_key_prefix, "fk_");
    assert_eq!(config.primary_key_prefix, "PK");
    assert_eq!(config.constraint_hash_length, 25);
}
