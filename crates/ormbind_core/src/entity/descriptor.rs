//! Class descriptors read once when an entity binding starts.

use crate::types::InheritanceType;
use serde::{Deserialize, Serialize};

/// Read-only view of a mapped class, as discovered by a front-end.
pub trait EntityDescriptor {
    /// Fully qualified class name.
    fn class_name(&self) -> &str;

    /// Returns true if the class is the root of its hierarchy.
    fn is_root(&self) -> bool;

    /// Inheritance strategy of the hierarchy.
    fn inheritance_type(&self) -> InheritanceType;
}

/// Plain [`EntityDescriptor`] value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityClass {
    name: String,
    root: bool,
    inheritance_type: InheritanceType,
}

impl EntityClass {
    /// Describes a root class without inheritance.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: true,
            inheritance_type: InheritanceType::NoInheritance,
        }
    }

    /// Describes a class in a hierarchy.
    pub fn in_hierarchy(name: impl Into<String>, root: bool, inheritance: InheritanceType) -> Self {
        Self {
            name: name.into(),
            root,
            inheritance_type: inheritance,
        }
    }
}

impl EntityDescriptor for EntityClass {
    fn class_name(&self) -> &str {
        &self.name
    }

    fn is_root(&self) -> bool {
        self.root
    }

    fn inheritance_type(&self) -> InheritanceType {
        self.inheritance_type
    }
}

/// A domain type and its chain of super types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchical {
    name: String,
    super_type: Option<Box<Hierarchical>>,
}

impl Hierarchical {
    /// Creates a type with no super type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_type: None,
        }
    }

    /// Creates a type extending `super_type`.
    pub fn extending(name: impl Into<String>, super_type: Hierarchical) -> Self {
        Self {
            name: name.into(),
            super_type: Some(Box::new(super_type)),
        }
    }

    /// Returns the type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the direct super type.
    pub fn super_type(&self) -> Option<&Hierarchical> {
        self.super_type.as_deref()
    }

    /// Iterates from this type up to the top of the hierarchy.
    pub fn ancestry(&self) -> impl Iterator<Item = &Hierarchical> {
        std::iter::successors(Some(self), |t| t.super_type())
    }
}
