//! Collection binding model.
//!
//! A [`CollectionBinding`] describes how a collection-valued property maps
//! to a collection table: its key back to the owner, an optional index
//! (map key or position), its elements, and sorting/ordering. Bindings ask
//! a [`TypeResolver`] for their runtime collection type and create their
//! keys once all structural data is bound.

mod binding;
mod resolver;
mod visitor;

pub use binding::{CollectionBinding, CollectionKind, Element};
pub use resolver::{CollectionType, CollectionTypeKind, Comparator, TypeFactory, TypeResolver};
pub use visitor::CollectionVisitor;
