//! Double dispatch over collection kinds.

use super::binding::CollectionBinding;
use crate::value::SimpleValue;

/// Visitor over collection bindings.
///
/// Every kind-specific method falls back to [`visit_collection`], so a
/// visitor only overrides the kinds it cares about and keeps compiling when
/// new kinds are added.
///
/// [`visit_collection`]: CollectionVisitor::visit_collection
pub trait CollectionVisitor {
    /// Value produced by a visit.
    type Output;

    /// Fallback for any kind without a dedicated override.
    fn visit_collection(&mut self, collection: &CollectionBinding) -> Self::Output;

    /// Visits a map.
    fn visit_map(&mut self, collection: &CollectionBinding, _index: &SimpleValue) -> Self::Output {
        self.visit_collection(collection)
    }

    /// Visits a set.
    fn visit_set(&mut self, collection: &CollectionBinding) -> Self::Output {
        self.visit_collection(collection)
    }

    /// Visits a bag.
    fn visit_bag(&mut self, collection: &CollectionBinding) -> Self::Output {
        self.visit_collection(collection)
    }

    /// Visits an identifier bag.
    fn visit_identifier_bag(
        &mut self,
        collection: &CollectionBinding,
        _identifier: &SimpleValue,
    ) -> Self::Output {
        self.visit_collection(collection)
    }

    /// Visits a list.
    fn visit_list(
        &mut self,
        collection: &CollectionBinding,
        _index: &SimpleValue,
        _base: i32,
    ) -> Self::Output {
        self.visit_collection(collection)
    }

    /// Visits an array.
    fn visit_array(
        &mut self,
        collection: &CollectionBinding,
        _index: &SimpleValue,
        _element_class: &str,
    ) -> Self::Output {
        self.visit_collection(collection)
    }

    /// Visits an array of primitives.
    fn visit_primitive_array(
        &mut self,
        collection: &CollectionBinding,
        index: &SimpleValue,
        element_class: &str,
    ) -> Self::Output {
        self.visit_array(collection, index, element_class)
    }
}
