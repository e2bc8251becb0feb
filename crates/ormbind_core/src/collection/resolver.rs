//! Collection type resolution.
//!
//! Bindings never construct their runtime collection type directly; they
//! ask a [`TypeResolver`] keyed by kind, role and referenced property.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordering used by a sorted collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    /// Natural ordering of the element (or map key) type.
    Natural,
    /// A named comparator implementation.
    Named(String),
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Natural => f.write_str("natural"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// The runtime collection semantics a binding resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionTypeKind {
    /// Unordered map.
    Map,
    /// Map kept sorted by a comparator.
    SortedMap,
    /// Map preserving the order-by order.
    OrderedMap,
    /// Unordered set.
    Set,
    /// Set kept sorted by a comparator.
    SortedSet,
    /// Set preserving the order-by order.
    OrderedSet,
    /// Unordered bag.
    Bag,
    /// Bag with a surrogate identifier column.
    IdentifierBag,
    /// Indexed list.
    List,
    /// Array of the named element class.
    Array(String),
    /// User-supplied collection type.
    Custom(String),
}

/// A resolved collection type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionType {
    /// Collection semantics.
    pub kind: CollectionTypeKind,
    /// Role of the owning binding.
    pub role: String,
    /// Property of the owner the key references; `None` is the identifier.
    pub referenced_property: Option<String>,
    /// Comparator, for sorted kinds only.
    pub comparator: Option<Comparator>,
}

impl CollectionType {
    /// Returns true for sorted kinds.
    pub fn is_sorted(&self) -> bool {
        matches!(
            self.kind,
            CollectionTypeKind::SortedMap | CollectionTypeKind::SortedSet
        )
    }

    /// Returns true for order-preserving kinds.
    pub fn is_ordered(&self) -> bool {
        matches!(
            self.kind,
            CollectionTypeKind::OrderedMap | CollectionTypeKind::OrderedSet
        )
    }
}

/// Supplies collection types to bindings.
///
/// Implementations must be safe for concurrent reads; the binding model
/// never mutates through them.
pub trait TypeResolver: Send + Sync {
    /// Resolves a built-in collection type.
    ///
    /// `comparator` is `Some` only for sorted kinds.
    fn resolve_collection_type(
        &self,
        kind: CollectionTypeKind,
        role: &str,
        referenced_property: Option<&str>,
        comparator: Option<&Comparator>,
    ) -> CollectionType;

    /// Resolves a user-supplied collection type by name.
    fn resolve_custom_collection_type(
        &self,
        type_name: &str,
        role: &str,
        referenced_property: Option<&str>,
    ) -> CollectionType {
        self.resolve_collection_type(
            CollectionTypeKind::Custom(type_name.to_string()),
            role,
            referenced_property,
            None,
        )
    }
}

/// Stock resolver producing plain [`CollectionType`] descriptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeFactory;

impl TypeResolver for TypeFactory {
    fn resolve_collection_type(
        &self,
        kind: CollectionTypeKind,
        role: &str,
        referenced_property: Option<&str>,
        comparator: Option<&Comparator>,
    ) -> CollectionType {
        CollectionType {
            kind,
            role: role.to_string(),
            referenced_property: referenced_property.map(str::to_string),
            comparator: comparator.cloned(),
        }
    }
}
