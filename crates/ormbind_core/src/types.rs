//! Core type definitions for the binding model.

use crate::error::MappingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an inheritance hierarchy is laid out over tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritanceType {
    /// The entity is not part of a hierarchy.
    NoInheritance,
    /// One table for the whole hierarchy, rows told apart by a discriminator.
    SingleTable,
    /// One table per class, joined on the primary key.
    Joined,
    /// One self-contained table per concrete class.
    TablePerClass,
}

impl Default for InheritanceType {
    fn default() -> Self {
        Self::NoInheritance
    }
}

/// Optimistic locking policy declared on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimisticLockType {
    /// Compare every column.
    All,
    /// No optimistic locking.
    None,
    /// Compare the columns that changed.
    Dirty,
    /// Compare a dedicated version column.
    Version,
}

impl FromStr for OptimisticLockType {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "none" => Ok(Self::None),
            "dirty" => Ok(Self::Dirty),
            "version" => Ok(Self::Version),
            other => Err(MappingError::invalid_value(format!(
                "unknown optimistic lock type: {other}"
            ))),
        }
    }
}

/// Numeric optimistic lock mode consumed by entity persisters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OptimisticLockMode(pub i32);

impl OptimisticLockMode {
    /// No optimistic locking.
    pub const NONE: Self = Self(-1);
    /// Version column check.
    pub const VERSION: Self = Self(0);
    /// Dirty columns check.
    pub const DIRTY: Self = Self(1);
    /// All columns check.
    pub const ALL: Self = Self(2);

    /// Returns the raw mode value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for OptimisticLockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NONE => f.write_str("none"),
            Self::VERSION => f.write_str("version"),
            Self::DIRTY => f.write_str("dirty"),
            Self::ALL => f.write_str("all"),
            Self(other) => write!(f, "lock:{other}"),
        }
    }
}

/// Representation of entity instances at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityMode {
    /// Plain domain objects.
    Pojo,
}

/// Concurrency strategy of a second-level cache region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessType {
    /// Entries never change.
    ReadOnly,
    /// Entries are updated under soft locks.
    ReadWrite,
    /// Entries are updated without locking.
    NonstrictReadWrite,
    /// Entries are updated inside the cache's own transactions.
    Transactional,
}

/// Caching policy of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Caching {
    /// Cache region name.
    pub region: String,
    /// Access strategy.
    pub access_type: AccessType,
    /// Whether lazily loaded properties are cached too.
    pub cache_lazy_properties: bool,
}

impl Caching {
    /// Creates a caching policy.
    pub fn new(region: impl Into<String>, access_type: AccessType) -> Self {
        Self {
            region: region.into(),
            access_type,
            cache_lazy_properties: true,
        }
    }
}

/// How the row count of a custom write statement is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultCheckStyle {
    /// No check.
    None,
    /// Check the affected row count.
    Count,
    /// Check an output parameter.
    Param,
}

/// A custom SQL statement overriding a generated insert, update or delete.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomSql {
    /// Statement text.
    pub sql: String,
    /// Whether the statement is a callable.
    pub callable: bool,
    /// Row count check style.
    pub check_style: ResultCheckStyle,
}

impl CustomSql {
    /// Creates a non-callable statement checked by row count.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            callable: false,
            check_style: ResultCheckStyle::Count,
        }
    }

    /// Marks the statement as callable.
    #[must_use]
    pub fn callable(mut self) -> Self {
        self.callable = true;
        self.check_style = ResultCheckStyle::Param;
        self
    }
}
