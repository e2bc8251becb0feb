//! Mapping fixtures.
//!
//! A small `Person` model: a root entity with a map of nicknames keyed by
//! language, a sorted set of tags, a list of addresses and a one-to-many
//! bag of orders. The audit side mirrors it with a `manager` relation.

use crate::metadata::InMemoryMetadata;
use ormbind_audit::{AuditConfiguration, AuditService};
use ormbind_core::{
    CollectionBinding, Column, Comparator, Element, EntityBindingState, EntityClass,
    OptimisticLockType, SimpleValue, Table,
};
use std::sync::Arc;

/// Name of the fixture entity.
pub const PERSON: &str = "Person";

/// The `Person` root class.
pub fn person_class() -> EntityClass {
    EntityClass::root(PERSON)
}

/// Key value of every `Person` collection table.
pub fn person_key() -> SimpleValue {
    SimpleValue::new().with_column(Column::new("person_id").not_null())
}

/// `Person.nicknames`: map language -> nickname, fully bound.
pub fn nickname_map() -> CollectionBinding {
    let mut map = CollectionBinding::map(PERSON, "nicknames");
    map.set_collection_table(Table::new("person_nicknames"));
    map.set_key(person_key());
    map.set_element(Element::Value(SimpleValue::of_columns(["nickname"])));
    map.set_index(
        SimpleValue::new()
            .with_column(Column::new("language").not_null())
            .typed("string"),
    )
    .expect("map carries an index");
    map
}

/// `Person.friendsByRole`: map keyed by another `Person`, fully bound.
pub fn entity_keyed_map() -> CollectionBinding {
    let mut map = CollectionBinding::map(PERSON, "friendsByRole");
    map.set_collection_table(Table::new("person_friends"));
    map.set_key(person_key());
    map.set_element(Element::Value(SimpleValue::of_columns(["role"])));
    map.set_index(
        SimpleValue::new()
            .with_column(Column::new("friend_id").not_null())
            .referencing(PERSON),
    )
    .expect("map carries an index");
    map
}

/// `Person.tags`: set of non-null tags sorted naturally.
pub fn sorted_tag_set() -> CollectionBinding {
    let mut set = CollectionBinding::set(PERSON, "tags");
    set.set_collection_table(Table::new("person_tags"));
    set.set_key(person_key());
    set.set_element(Element::Value(
        SimpleValue::new().with_column(Column::new("tag").not_null()),
    ));
    set.set_comparator(Some(Comparator::Natural));
    set
}

/// `Person.addresses`: zero-based list.
pub fn address_list() -> CollectionBinding {
    let mut list = CollectionBinding::list(PERSON, "addresses");
    list.set_collection_table(Table::new("person_addresses"));
    list.set_key(person_key());
    list.set_element(Element::Value(SimpleValue::of_columns(["street", "city"])));
    list.set_index(SimpleValue::new().with_column(Column::new("position").not_null()))
        .expect("list carries an index");
    list
}

/// `Person.orders`: one-to-many bag of `Order`.
pub fn order_bag() -> CollectionBinding {
    let mut bag = CollectionBinding::bag(PERSON, "orders");
    bag.set_collection_table(Table::new("orders"));
    bag.set_key(SimpleValue::of_columns(["customer_id"]));
    bag.set_element(Element::OneToMany {
        referenced_entity: "Order".to_string(),
    });
    bag
}

/// `Person` entity state with version locking and every collection fixture.
pub fn person_state() -> EntityBindingState {
    let mut state = EntityBindingState::new(None, &person_class());
    state.set_optimistic_lock(OptimisticLockType::Version);
    state.add_synchronized_table_name("person");
    state.add_collection(nickname_map());
    state.add_collection(entity_keyed_map());
    state.add_collection(sorted_tag_set());
    state.add_collection(address_list());
    state.add_collection(order_bag());
    state
}

/// Audit metadata for `Person(id; name, age, manager -> Person, friends -> Person*)`.
pub fn person_metadata() -> Arc<InMemoryMetadata> {
    let metadata = InMemoryMetadata::new();
    metadata.add_entity(PERSON, ["id"]);
    metadata.add_property(PERSON, "name");
    metadata.add_property(PERSON, "age");
    metadata.add_property(PERSON, "nickname");
    metadata.add_relation(PERSON, "manager", PERSON, "id", true);
    metadata.add_relation(PERSON, "friends", PERSON, "id", false);
    Arc::new(metadata)
}

/// Audit service with default configuration over `metadata`.
pub fn audit_service(metadata: &Arc<InMemoryMetadata>) -> AuditService {
    audit_service_with(AuditConfiguration::default(), metadata)
}

/// Audit service with the given configuration over `metadata`.
pub fn audit_service_with(
    configuration: AuditConfiguration,
    metadata: &Arc<InMemoryMetadata>,
) -> AuditService {
    AuditService::new(configuration, metadata.clone())
}
