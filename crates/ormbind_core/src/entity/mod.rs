//! Entity binding model.
//!
//! An [`EntityBindingState`] is filled in by a mapping front-end during a
//! single pass and then consumed by [`EntityBindingState::build`] into an
//! immutable [`EntityBinding`].

mod binding;
mod descriptor;
mod state;

pub use binding::{CollectionMapping, EntityBinding};
pub use descriptor::{EntityClass, EntityDescriptor, Hierarchical};
pub use state::{EntityBindingState, MetaAttributes, UNSET_BATCH_SIZE};
