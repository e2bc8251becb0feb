//! Property-based test generators using proptest.
//!
//! Provides strategies for generating mapping data that keeps the
//! invariants bindings rely on (non-empty names, valid batch sizes).

use ormbind_core::{
    CollectionBinding, Column, Comparator, Element, OptimisticLockType, SimpleValue, Table,
};
use proptest::prelude::*;

/// Sorting and ordering flags of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionFlags {
    /// Comparator of a sorted collection.
    pub comparator: Option<Comparator>,
    /// Order-by clause of an ordered collection.
    pub order_by: Option<String>,
    /// Custom collection type name.
    pub custom_type_name: Option<String>,
}

impl CollectionFlags {
    /// Applies the flags to `binding`.
    pub fn apply(&self, binding: &mut CollectionBinding) {
        binding.set_comparator(self.comparator.clone());
        binding.set_order_by(self.order_by.clone());
        binding.set_custom_type_name(self.custom_type_name.clone());
    }
}

/// Strategy for generating valid identifiers (entity, table, column names).
pub fn identifier_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("Invalid regex")
}

/// Strategy for generating table names.
pub fn table_name_strategy() -> impl Strategy<Value = String> {
    identifier_strategy()
}

/// Strategy for generating distinct, non-empty column name lists.
pub fn column_names_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(identifier_strategy(), 1..4)
        .prop_map(|names| names.into_iter().collect())
}

/// Strategy for generating comparators.
pub fn comparator_strategy() -> impl Strategy<Value = Comparator> {
    prop_oneof![
        Just(Comparator::Natural),
        identifier_strategy().prop_map(Comparator::Named),
    ]
}

/// Strategy for generating collection flags.
pub fn collection_flags_strategy() -> impl Strategy<Value = CollectionFlags> {
    (
        prop::option::of(comparator_strategy()),
        prop::option::of(identifier_strategy().prop_map(|c| format!("{c} asc"))),
        prop::option::weighted(0.2, identifier_strategy()),
    )
        .prop_map(|(comparator, order_by, custom_type_name)| CollectionFlags {
            comparator,
            order_by,
            custom_type_name,
        })
}

/// Strategy for generating optimistic lock types.
pub fn lock_type_strategy() -> impl Strategy<Value = OptimisticLockType> {
    prop_oneof![
        Just(OptimisticLockType::All),
        Just(OptimisticLockType::None),
        Just(OptimisticLockType::Dirty),
        Just(OptimisticLockType::Version),
    ]
}

/// Strategy for generating valid batch sizes: unset (-1) or non-negative.
pub fn batch_size_strategy() -> impl Strategy<Value = i32> {
    prop_oneof![Just(-1), 0..=1024i32]
}

/// Strategy for generating fully bound map bindings of `owner`.
///
/// Key and index columns are disjoint. The index references another
/// entity about half the time.
pub fn map_binding_strategy(owner: &'static str) -> impl Strategy<Value = CollectionBinding> {
    (
        identifier_strategy(),
        table_name_strategy(),
        column_names_strategy(),
        column_names_strategy(),
        prop::option::of(identifier_strategy()),
        any::<bool>(),
        collection_flags_strategy(),
    )
        .prop_map(
            move |(property, table, key, index, index_target, inverse, flags)| {
                let mut map = CollectionBinding::map(owner, &property);
                map.set_collection_table(Table::new(table));
                map.set_key(not_null_value(key.iter().map(|c| format!("k_{c}"))));
                let mut index = not_null_value(index.iter().map(|c| format!("i_{c}")));
                if let Some(target) = index_target {
                    index = index.referencing(target);
                }
                map.set_index(index).expect("map carries an index");
                map.set_element(Element::Value(SimpleValue::of_columns(["element"])));
                map.set_inverse(inverse);
                flags.apply(&mut map);
                map
            },
        )
}

fn not_null_value(names: impl Iterator<Item = String>) -> SimpleValue {
    names.fold(SimpleValue::new(), |value, name| {
        value.with_column(Column::new(name).not_null())
    })
}
