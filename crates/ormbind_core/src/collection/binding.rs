//! Collection bindings.

use super::resolver::{CollectionType, CollectionTypeKind, Comparator, TypeResolver};
use super::visitor::CollectionVisitor;
use crate::config::Config;
use crate::error::{MappingError, MappingResult};
use crate::relational::{Column, Table};
use crate::value::SimpleValue;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Kind of a collection, with the data only that kind carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionKind {
    /// Keyed by an index value (basic or entity).
    Map {
        /// Map key value.
        index: SimpleValue,
    },
    /// No duplicates, no index.
    Set,
    /// Duplicates allowed, no index.
    Bag,
    /// Bag with a surrogate row identifier.
    IdentifierBag {
        /// Surrogate identifier value.
        identifier: SimpleValue,
    },
    /// Positional list.
    List {
        /// Position column value.
        index: SimpleValue,
        /// Value of the first position.
        base: i32,
    },
    /// Array of objects.
    Array {
        /// Position column value.
        index: SimpleValue,
        /// Element class name.
        element_class: String,
    },
    /// Array of primitives.
    PrimitiveArray {
        /// Position column value.
        index: SimpleValue,
        /// Primitive element class name.
        element_class: String,
    },
}

impl CollectionKind {
    fn index(&self) -> Option<&SimpleValue> {
        match self {
            Self::Map { index }
            | Self::List { index, .. }
            | Self::Array { index, .. }
            | Self::PrimitiveArray { index, .. } => Some(index),
            Self::Set | Self::Bag | Self::IdentifierBag { .. } => None,
        }
    }

    fn index_mut(&mut self) -> Option<&mut SimpleValue> {
        match self {
            Self::Map { index }
            | Self::List { index, .. }
            | Self::Array { index, .. }
            | Self::PrimitiveArray { index, .. } => Some(index),
            Self::Set | Self::Bag | Self::IdentifierBag { .. } => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Map { .. } => "map",
            Self::Set => "set",
            Self::Bag => "bag",
            Self::IdentifierBag { .. } => "idbag",
            Self::List { .. } => "list",
            Self::Array { .. } => "array",
            Self::PrimitiveArray { .. } => "primitive-array",
        }
    }
}

/// What a collection holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    /// Values stored in the collection table (basic values or many-to-many).
    Value(SimpleValue),
    /// Rows of another entity's table pointing back at the owner.
    OneToMany {
        /// The element entity.
        referenced_entity: String,
    },
}

/// Mapping of a collection-valued entity property.
///
/// Populated field by field by a mapping front-end, then finalized by a
/// single [`create_all_keys`](Self::create_all_keys) pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionBinding {
    role: String,
    owner_entity: String,
    kind: CollectionKind,
    key: SimpleValue,
    element: Option<Element>,
    referenced_property_name: Option<String>,
    comparator: Option<Comparator>,
    order_by: Option<String>,
    custom_type_name: Option<String>,
    inverse: bool,
    lazy: bool,
    batch_size: i32,
    where_filter: Option<String>,
    table: Option<Table>,
}

impl CollectionBinding {
    /// Creates a binding for `owner_entity.property`.
    pub fn new(kind: CollectionKind, owner_entity: &str, property: &str) -> Self {
        Self {
            role: format!("{owner_entity}.{property}"),
            owner_entity: owner_entity.to_string(),
            kind,
            key: SimpleValue::new(),
            element: None,
            referenced_property_name: None,
            comparator: None,
            order_by: None,
            custom_type_name: None,
            inverse: false,
            lazy: true,
            batch_size: -1,
            where_filter: None,
            table: None,
        }
    }

    /// Creates a map binding with an unbound index.
    pub fn map(owner_entity: &str, property: &str) -> Self {
        Self::new(
            CollectionKind::Map {
                index: SimpleValue::new(),
            },
            owner_entity,
            property,
        )
    }

    /// Creates a set binding.
    pub fn set(owner_entity: &str, property: &str) -> Self {
        Self::new(CollectionKind::Set, owner_entity, property)
    }

    /// Creates a bag binding.
    pub fn bag(owner_entity: &str, property: &str) -> Self {
        Self::new(CollectionKind::Bag, owner_entity, property)
    }

    /// Creates an identifier bag binding with an unbound identifier.
    pub fn identifier_bag(owner_entity: &str, property: &str) -> Self {
        Self::new(
            CollectionKind::IdentifierBag {
                identifier: SimpleValue::new(),
            },
            owner_entity,
            property,
        )
    }

    /// Creates a zero-based list binding with an unbound index.
    pub fn list(owner_entity: &str, property: &str) -> Self {
        Self::new(
            CollectionKind::List {
                index: SimpleValue::new(),
                base: 0,
            },
            owner_entity,
            property,
        )
    }

    /// Creates an array binding with an unbound index.
    pub fn array(owner_entity: &str, property: &str, element_class: &str) -> Self {
        Self::new(
            CollectionKind::Array {
                index: SimpleValue::new(),
                element_class: element_class.to_string(),
            },
            owner_entity,
            property,
        )
    }

    /// Creates a primitive array binding with an unbound index.
    pub fn primitive_array(owner_entity: &str, property: &str, element_class: &str) -> Self {
        Self::new(
            CollectionKind::PrimitiveArray {
                index: SimpleValue::new(),
                element_class: element_class.to_string(),
            },
            owner_entity,
            property,
        )
    }

    // ---- structure ----

    /// Returns the role: the owner's entity name qualified property name.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Returns the owning entity name.
    pub fn owner_entity_name(&self) -> &str {
        &self.owner_entity
    }

    /// Returns the kind.
    pub fn kind(&self) -> &CollectionKind {
        &self.kind
    }

    /// Returns true for maps.
    pub fn is_map(&self) -> bool {
        matches!(self.kind, CollectionKind::Map { .. })
    }

    /// Returns true for kinds keyed by an index column.
    pub fn is_indexed(&self) -> bool {
        self.kind.index().is_some()
    }

    /// Returns true for arrays, primitive or not.
    pub fn is_array(&self) -> bool {
        matches!(
            self.kind,
            CollectionKind::Array { .. } | CollectionKind::PrimitiveArray { .. }
        )
    }

    /// Sets the key value referencing the owner.
    pub fn set_key(&mut self, key: SimpleValue) {
        self.key = key;
    }

    /// Returns the key value.
    pub fn key(&self) -> &SimpleValue {
        &self.key
    }

    /// Sets the index (map key, list or array position).
    pub fn set_index(&mut self, value: SimpleValue) -> MappingResult<()> {
        let kind = self.kind.name();
        match self.kind.index_mut() {
            Some(index) => {
                *index = value;
                Ok(())
            }
            None => Err(MappingError::invalid_value(format!(
                "{kind} collection {} has no index",
                self.role
            ))),
        }
    }

    /// Returns the index value of indexed kinds.
    pub fn index(&self) -> Option<&SimpleValue> {
        self.kind.index()
    }

    /// Sets the surrogate identifier of an identifier bag.
    pub fn set_identifier(&mut self, value: SimpleValue) -> MappingResult<()> {
        match &mut self.kind {
            CollectionKind::IdentifierBag { identifier } => {
                *identifier = value;
                Ok(())
            }
            other => Err(MappingError::invalid_value(format!(
                "{} collection {} has no identifier",
                other.name(),
                self.role
            ))),
        }
    }

    /// Sets the first position value of a list.
    pub fn set_list_base(&mut self, value: i32) -> MappingResult<()> {
        match &mut self.kind {
            CollectionKind::List { base, .. } => {
                *base = value;
                Ok(())
            }
            other => Err(MappingError::invalid_value(format!(
                "{} collection {} has no list base",
                other.name(),
                self.role
            ))),
        }
    }

    /// Sets the element.
    pub fn set_element(&mut self, element: Element) {
        self.element = Some(element);
    }

    /// Returns the element.
    pub fn element(&self) -> Option<&Element> {
        self.element.as_ref()
    }

    /// Returns true if the elements are rows of another entity's table.
    pub fn is_one_to_many(&self) -> bool {
        matches!(self.element, Some(Element::OneToMany { .. }))
    }

    /// Sets the table holding the collection rows.
    pub fn set_collection_table(&mut self, table: Table) {
        self.table = Some(table);
    }

    /// Returns the collection table.
    pub fn collection_table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Sets the owner property the key references; `None` means the owner's
    /// identifier.
    pub fn set_referenced_property_name(&mut self, name: Option<String>) {
        self.referenced_property_name = name;
    }

    /// Returns the referenced owner property.
    pub fn referenced_property_name(&self) -> Option<&str> {
        self.referenced_property_name.as_deref()
    }

    // ---- semantics ----

    /// Sets the comparator; a collection is sorted exactly when it has one.
    pub fn set_comparator(&mut self, comparator: Option<Comparator>) {
        self.comparator = comparator;
    }

    /// Returns the comparator.
    pub fn comparator(&self) -> Option<&Comparator> {
        self.comparator.as_ref()
    }

    /// Returns true if the collection is sorted in memory.
    pub fn is_sorted(&self) -> bool {
        self.comparator.is_some()
    }

    /// Sets the order-by fragment.
    pub fn set_order_by(&mut self, order_by: Option<String>) {
        self.order_by = order_by;
    }

    /// Returns the order-by fragment.
    pub fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    /// Returns true if rows are loaded in a declared order. A blank
    /// order-by declares none.
    pub fn has_order(&self) -> bool {
        self.order_by
            .as_deref()
            .is_some_and(|order_by| !order_by.trim().is_empty())
    }

    /// Sets a user-supplied collection type name.
    pub fn set_custom_type_name(&mut self, type_name: Option<String>) {
        self.custom_type_name = type_name;
    }

    /// Returns the user-supplied collection type name.
    pub fn custom_type_name(&self) -> Option<&str> {
        self.custom_type_name.as_deref()
    }

    /// Marks the collection as the inverse side of the association.
    pub fn set_inverse(&mut self, inverse: bool) {
        self.inverse = inverse;
    }

    /// Returns true if the other side owns the foreign key relationship.
    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    /// Sets laziness.
    pub fn set_lazy(&mut self, lazy: bool) {
        self.lazy = lazy;
    }

    /// Returns true if the collection loads lazily.
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// Sets the batch fetch size; -1 means unset.
    pub fn set_batch_size(&mut self, batch_size: i32) {
        self.batch_size = batch_size;
    }

    /// Returns the batch fetch size.
    pub fn batch_size(&self) -> i32 {
        self.batch_size
    }

    /// Sets the where filter applied when loading.
    pub fn set_where_filter(&mut self, filter: Option<String>) {
        self.where_filter = filter;
    }

    /// Returns the where filter.
    pub fn where_filter(&self) -> Option<&str> {
        self.where_filter.as_deref()
    }

    // ---- finalization ----

    /// Resolves the built-in collection type implied by kind and flags.
    ///
    /// Sorted beats ordered beats plain.
    pub fn default_collection_type(&self, resolver: &dyn TypeResolver) -> CollectionType {
        let role = self.role.as_str();
        let referenced = self.referenced_property_name.as_deref();
        let (kind, comparator) = match &self.kind {
            CollectionKind::Map { .. } => self.sorted_or_ordered(
                CollectionTypeKind::SortedMap,
                CollectionTypeKind::OrderedMap,
                CollectionTypeKind::Map,
            ),
            CollectionKind::Set => self.sorted_or_ordered(
                CollectionTypeKind::SortedSet,
                CollectionTypeKind::OrderedSet,
                CollectionTypeKind::Set,
            ),
            CollectionKind::Bag => (CollectionTypeKind::Bag, None),
            CollectionKind::IdentifierBag { .. } => (CollectionTypeKind::IdentifierBag, None),
            CollectionKind::List { .. } => (CollectionTypeKind::List, None),
            CollectionKind::Array { element_class, .. }
            | CollectionKind::PrimitiveArray { element_class, .. } => {
                (CollectionTypeKind::Array(element_class.clone()), None)
            }
        };
        debug!(role, kind = ?kind, "resolving collection type");
        resolver.resolve_collection_type(kind, role, referenced, comparator)
    }

    /// Resolves the collection type, honouring a custom type name.
    pub fn collection_type(&self, resolver: &dyn TypeResolver) -> CollectionType {
        match self.custom_type_name.as_deref() {
            Some(type_name) => resolver.resolve_custom_collection_type(
                type_name,
                &self.role,
                self.referenced_property_name.as_deref(),
            ),
            None => self.default_collection_type(resolver),
        }
    }

    fn sorted_or_ordered(
        &self,
        sorted: CollectionTypeKind,
        ordered: CollectionTypeKind,
        plain: CollectionTypeKind,
    ) -> (CollectionTypeKind, Option<&Comparator>) {
        if let Some(comparator) = self.comparator.as_ref() {
            (sorted, Some(comparator))
        } else if self.has_order() {
            (ordered, None)
        } else {
            (plain, None)
        }
    }

    /// Creates the collection's keys and constraints.
    ///
    /// Must run exactly once, after every structural setter. Nothing is
    /// attached to the table unless validation passes. An inverse collection
    /// creates no constraints: the owning side does. The element and owner
    /// foreign keys reference the owner's identifier, so a key bound to a
    /// referenced property gets neither.
    pub fn create_all_keys(&mut self, config: &Config) -> MappingResult<()> {
        self.validate_keys()?;

        let Self {
            role,
            owner_entity,
            kind,
            key,
            element,
            referenced_property_name,
            inverse,
            table,
            ..
        } = self;
        let table = table
            .as_mut()
            .ok_or_else(|| MappingError::missing_collection_table(role.as_str()))?;

        if *inverse {
            debug!(role = role.as_str(), "inverse collection, no keys created");
            return Ok(());
        }

        if referenced_property_name.is_none() {
            if let Some(Element::Value(value)) = element.as_ref() {
                value.create_foreign_key(table, config);
            }
            key.create_foreign_key_of_entity(owner_entity, table, config);
        }

        let one_to_many = matches!(element, Some(Element::OneToMany { .. }));
        if !one_to_many {
            if let Some(columns) = primary_key_columns(kind, key, element.as_ref()) {
                table.create_primary_key(columns, config);
            }
        }

        match kind {
            CollectionKind::Map { index } => {
                index.create_foreign_key(table, config);
            }
            CollectionKind::IdentifierBag { identifier } => {
                identifier.create_foreign_key(table, config);
            }
            _ => {}
        }

        debug!(
            role = role.as_str(),
            foreign_keys = table.foreign_keys().len(),
            primary_key = table.primary_key().is_some(),
            "collection keys created"
        );
        Ok(())
    }

    fn validate_keys(&self) -> MappingResult<()> {
        if self.table.is_none() {
            return Err(MappingError::missing_collection_table(&self.role));
        }
        if !self.key.has_columns() {
            return Err(MappingError::missing_key_columns(&self.role));
        }
        match &self.kind {
            CollectionKind::IdentifierBag { identifier } if !identifier.has_columns() => {
                Err(MappingError::missing_identifier(&self.role))
            }
            kind => match kind.index() {
                Some(index) if !index.has_columns() => Err(MappingError::missing_index(&self.role)),
                _ => Ok(()),
            },
        }
    }

    /// Dispatches to the visitor method for this collection's kind.
    pub fn accept<V: CollectionVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match &self.kind {
            CollectionKind::Map { index } => visitor.visit_map(self, index),
            CollectionKind::Set => visitor.visit_set(self),
            CollectionKind::Bag => visitor.visit_bag(self),
            CollectionKind::IdentifierBag { identifier } => {
                visitor.visit_identifier_bag(self, identifier)
            }
            CollectionKind::List { index, base } => visitor.visit_list(self, index, *base),
            CollectionKind::Array {
                index,
                element_class,
            } => visitor.visit_array(self, index, element_class),
            CollectionKind::PrimitiveArray {
                index,
                element_class,
            } => visitor.visit_primitive_array(self, index, element_class),
        }
    }
}

/// Primary key of a collection table, or `None` when the kind has none.
fn primary_key_columns(
    kind: &CollectionKind,
    key: &SimpleValue,
    element: Option<&Element>,
) -> Option<Vec<Column>> {
    let mut columns: Vec<Column> = key.columns().to_vec();
    match kind {
        CollectionKind::Map { index }
        | CollectionKind::List { index, .. }
        | CollectionKind::Array { index, .. }
        | CollectionKind::PrimitiveArray { index, .. } => {
            columns.extend(index.columns().iter().cloned());
            Some(columns)
        }
        // A set row is identified by its elements; nullable ones can't be.
        CollectionKind::Set => match element {
            Some(Element::Value(value)) if value.has_columns() && !has_nullable(value) => {
                columns.extend(value.columns().iter().cloned());
                Some(columns)
            }
            _ => None,
        },
        CollectionKind::IdentifierBag { identifier } => Some(identifier.columns().to_vec()),
        CollectionKind::Bag => None,
    }
}

fn has_nullable(value: &SimpleValue) -> bool {
    value.columns().iter().any(|c| c.nullable)
}
