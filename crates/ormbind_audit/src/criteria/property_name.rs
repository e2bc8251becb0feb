//! Property references resolved when a criterion meets an entity.

use crate::config::AuditConfiguration;
use crate::error::AuditResult;
use std::fmt;
use std::sync::Arc;

/// Resolves a property name against the entity being queried.
pub type DeferredName = Arc<dyn Fn(&str) -> AuditResult<String> + Send + Sync>;

/// A reference to the property a criterion restricts.
///
/// Names are produced at evaluation time, with the queried entity passed in
/// explicitly, so one criterion can serve several entity types.
#[derive(Clone)]
pub enum PropertyNameGetter {
    /// A property of the audited entity, by name.
    Entity(String),
    /// A property of the audited entity, chosen per entity type.
    Deferred(DeferredName),
    /// The revision number.
    RevisionNumber,
    /// A property of the revision entity.
    RevisionProperty(String),
    /// The revision type (add, modify, delete).
    RevisionType,
    /// The modified flag of another property.
    ModifiedFlag(Box<PropertyNameGetter>),
}

impl PropertyNameGetter {
    /// Wraps a closure mapping an entity name to a property name.
    pub fn deferred<F>(resolve: F) -> Self
    where
        F: Fn(&str) -> AuditResult<String> + Send + Sync + 'static,
    {
        Self::Deferred(Arc::new(resolve))
    }

    /// Returns true if the name denotes a property of the audited entity
    /// itself rather than of the revision.
    pub fn is_entity_property(&self) -> bool {
        matches!(self, Self::Entity(_) | Self::Deferred(_))
    }

    /// Produces the raw property name for `entity_name`.
    ///
    /// Identifier mapping and existence checks happen in
    /// [`determine_property_name`](super::determine_property_name).
    pub fn property_name(
        &self,
        config: &AuditConfiguration,
        entity_name: &str,
    ) -> AuditResult<String> {
        match self {
            Self::Entity(name) => Ok(name.clone()),
            Self::Deferred(resolve) => resolve(entity_name),
            Self::RevisionNumber => Ok(config.revision_number_path()),
            Self::RevisionProperty(name) => Ok(config.revision_property_path(name)),
            Self::RevisionType => Ok(config.revision_type_prop_name.clone()),
            Self::ModifiedFlag(inner) => Ok(format!(
                "{}{}",
                inner.property_name(config, entity_name)?,
                config.modified_flag_suffix
            )),
        }
    }
}

impl fmt::Debug for PropertyNameGetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(name) => f.debug_tuple("Entity").field(name).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
            Self::RevisionNumber => f.write_str("RevisionNumber"),
            Self::RevisionProperty(name) => f.debug_tuple("RevisionProperty").field(name).finish(),
            Self::RevisionType => f.write_str("RevisionType"),
            Self::ModifiedFlag(inner) => f.debug_tuple("ModifiedFlag").field(inner).finish(),
        }
    }
}

impl From<&str> for PropertyNameGetter {
    fn from(name: &str) -> Self {
        Self::Entity(name.to_string())
    }
}

impl From<String> for PropertyNameGetter {
    fn from(name: String) -> Self {
        Self::Entity(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditError;

    #[test]
    fn revision_names() {
        let config = AuditConfiguration::default();
        assert_eq!(
            PropertyNameGetter::RevisionNumber
                .property_name(&config, "Person")
                .unwrap(),
            "originalId.REV.id"
        );
        assert_eq!(
            PropertyNameGetter::RevisionType
                .property_name(&config, "Person")
                .unwrap(),
            "REVTYPE"
        );
    }

    #[test]
    fn deferred_sees_entity() {
        let getter = PropertyNameGetter::deferred(|entity| match entity {
            "Person" => Ok("surname".to_string()),
            other => Err(AuditError::unresolvable_property("name", other)),
        });
        let config = AuditConfiguration::default();
        assert_eq!(getter.property_name(&config, "Person").unwrap(), "surname");
        assert!(getter.property_name(&config, "Pet").is_err());
        assert_eq!(format!("{getter:?}"), "Deferred(..)");
    }

    #[test]
    fn modified_flag_suffix() {
        let getter = PropertyNameGetter::ModifiedFlag(Box::new("age".into()));
        let config = AuditConfiguration::default();
        assert_eq!(getter.property_name(&config, "Person").unwrap(), "age_MOD");
        assert!(!getter.is_entity_property());
    }
}
