//! Error types for audit query building.

use thiserror::Error;

/// Result type for audit query building.
pub type AuditResult<T> = Result<T, AuditError>;

/// Mapping-definition errors raised while a criterion contributes to a query.
///
/// A single failing criterion aborts the whole query build.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// A relation was used where only scalar properties are allowed.
    #[error("this type of operation: {property} ({entity}) isn't supported and can't be used in queries")]
    UnsupportedRelationOperation {
        /// The relation property.
        property: String,
        /// The queried entity.
        entity: String,
    },

    /// A relation-only criterion was used on a scalar property.
    #[error("property {property} of {entity} is not a relation to another entity")]
    RelationRequired {
        /// The scalar property.
        property: String,
        /// The queried entity.
        entity: String,
    },

    /// The entity is not audited.
    #[error("entity {entity} is not audited")]
    UnknownEntity {
        /// The entity name.
        entity: String,
    },

    /// A property reference could not be bound to the entity.
    #[error("property {property} cannot be resolved on {entity}")]
    UnresolvableProperty {
        /// The property reference.
        property: String,
        /// The queried entity.
        entity: String,
    },

    /// An operator token is unusable.
    #[error("invalid operator: {op:?}")]
    InvalidOperator {
        /// The operator token.
        op: String,
    },

    /// A criterion is malformed.
    #[error("invalid criterion: {message}")]
    InvalidCriterion {
        /// Description of the problem.
        message: String,
    },
}

impl AuditError {
    /// Creates an unsupported relation operation error.
    pub fn unsupported_relation(property: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::UnsupportedRelationOperation {
            property: property.into(),
            entity: entity.into(),
        }
    }

    /// Creates a relation required error.
    pub fn relation_required(property: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::RelationRequired {
            property: property.into(),
            entity: entity.into(),
        }
    }

    /// Creates an unknown entity error.
    pub fn unknown_entity(entity: impl Into<String>) -> Self {
        Self::UnknownEntity {
            entity: entity.into(),
        }
    }

    /// Creates an unresolvable property error.
    pub fn unresolvable_property(property: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::UnresolvableProperty {
            property: property.into(),
            entity: entity.into(),
        }
    }

    /// Creates an invalid operator error.
    pub fn invalid_operator(op: impl Into<String>) -> Self {
        Self::InvalidOperator { op: op.into() }
    }

    /// Creates an invalid criterion error.
    pub fn invalid_criterion(message: impl Into<String>) -> Self {
        Self::InvalidCriterion {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_message_names_property() {
        let err = AuditError::unsupported_relation("manager", "Person");
        assert_eq!(
            err.to_string(),
            "this type of operation: manager (Person) isn't supported and can't be used in queries"
        );
    }
}
