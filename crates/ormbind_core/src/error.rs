//! Error types for the binding model.

use thiserror::Error;

/// Result type for binding operations.
pub type MappingResult<T> = Result<T, MappingError>;

/// Mapping-definition errors.
///
/// These are user-correctable: the mapping front-end supplied an incomplete
/// or inconsistent description. Programming defects (such as an optimistic
/// lock mode that was never configured) panic instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// A collection reached key creation without key columns.
    #[error("collection {role} has no key columns bound")]
    MissingKeyColumns {
        /// Role of the offending collection.
        role: String,
    },

    /// An indexed collection reached key creation without index columns.
    #[error("collection {role} has no index columns bound")]
    MissingIndex {
        /// Role of the offending collection.
        role: String,
    },

    /// An identifier bag reached key creation without identifier columns.
    #[error("collection {role} has no identifier columns bound")]
    MissingIdentifier {
        /// Role of the offending collection.
        role: String,
    },

    /// A collection has no table to attach constraints to.
    #[error("collection {role} has no collection table")]
    MissingCollectionTable {
        /// Role of the offending collection.
        role: String,
    },

    /// A value is not usable in its position.
    #[error("invalid value: {message}")]
    InvalidValue {
        /// Description of the problem.
        message: String,
    },

    /// An entity binding state failed validation at build time.
    #[error("invalid binding for entity {entity}: {message}")]
    InvalidEntityState {
        /// Class name of the entity.
        entity: String,
        /// Description of the problem.
        message: String,
    },
}

impl MappingError {
    /// Creates a missing key columns error.
    pub fn missing_key_columns(role: impl Into<String>) -> Self {
        Self::MissingKeyColumns { role: role.into() }
    }

    /// Creates a missing index error.
    pub fn missing_index(role: impl Into<String>) -> Self {
        Self::MissingIndex { role: role.into() }
    }

    /// Creates a missing identifier error.
    pub fn missing_identifier(role: impl Into<String>) -> Self {
        Self::MissingIdentifier { role: role.into() }
    }

    /// Creates a missing collection table error.
    pub fn missing_collection_table(role: impl Into<String>) -> Self {
        Self::MissingCollectionTable { role: role.into() }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue {
            message: message.into(),
        }
    }

    /// Creates an invalid entity state error.
    pub fn invalid_entity_state(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEntityState {
            entity: entity.into(),
            message: message.into(),
        }
    }
}
