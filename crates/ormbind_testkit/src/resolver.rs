//! A type resolver that records every request.

use ormbind_core::{CollectionType, CollectionTypeKind, Comparator, TypeFactory, TypeResolver};
use parking_lot::Mutex;

/// One call made to a [`RecordingTypeResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverCall {
    /// Requested kind.
    pub kind: CollectionTypeKind,
    /// Collection role.
    pub role: String,
    /// Referenced property, if any.
    pub referenced_property: Option<String>,
    /// Comparator, passed for sorted kinds only.
    pub comparator: Option<Comparator>,
}

/// Delegates to [`TypeFactory`] and keeps a log of the calls.
#[derive(Debug, Default)]
pub struct RecordingTypeResolver {
    calls: Mutex<Vec<ResolverCall>>,
}

impl RecordingTypeResolver {
    /// Creates a resolver with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the calls so far.
    pub fn calls(&self) -> Vec<ResolverCall> {
        self.calls.lock().clone()
    }

    /// Returns the kinds requested so far.
    pub fn kinds(&self) -> Vec<CollectionTypeKind> {
        self.calls.lock().iter().map(|c| c.kind.clone()).collect()
    }

    /// Clears the log.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}

impl TypeResolver for RecordingTypeResolver {
    fn resolve_collection_type(
        &self,
        kind: CollectionTypeKind,
        role: &str,
        referenced_property: Option<&str>,
        comparator: Option<&Comparator>,
    ) -> CollectionType {
        self.calls.lock().push(ResolverCall {
            kind: kind.clone(),
            role: role.to_string(),
            referenced_property: referenced_property.map(str::to_string),
            comparator: comparator.cloned(),
        });
        TypeFactory.resolve_collection_type(kind, role, referenced_property, comparator)
    }
}
