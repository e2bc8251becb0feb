//! # ormbind Core
//!
//! In-memory binding model of an object-relational mapping.
//!
//! This crate provides:
//! - A relational model of tables, columns and key constraints
//! - Collection bindings (map, set, bag, list, array) with type resolution,
//!   key creation and a visitor over collection kinds
//! - Entity binding state, populated by a mapping front-end and frozen into
//!   an immutable entity binding
//!
//! Parsing mapping sources, emitting DDL and executing statements are left
//! to other layers.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod collection;
mod config;
pub mod entity;
mod error;
pub mod relational;
mod types;
mod value;

pub use collection::{
    CollectionBinding, CollectionKind, CollectionType, CollectionTypeKind, CollectionVisitor,
    Comparator, Element, TypeFactory, TypeResolver,
};
pub use config::Config;
pub use entity::{
    CollectionMapping, EntityBinding, EntityBindingState, EntityClass, EntityDescriptor,
    Hierarchical, UNSET_BATCH_SIZE,
};
pub use error::{MappingError, MappingResult};
pub use relational::{Column, ForeignKey, PrimaryKey, Table};
pub use types::{
    AccessType, Caching, CustomSql, EntityMode, InheritanceType, OptimisticLockMode,
    OptimisticLockType, ResultCheckStyle,
};
pub use value::SimpleValue;
