//! Audit schema configuration.

use serde::{Deserialize, Serialize};

/// Names used by the historical (audit) schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfiguration {
    /// Property holding the composite id of an audit row.
    pub original_id_prop_name: String,
    /// Revision field inside the original id.
    pub revision_field_name: String,
    /// Path from the revision field to the revision number.
    pub revision_number_path: String,
    /// Property holding the revision type (add, modify, delete).
    pub revision_type_prop_name: String,
    /// Suffix of modified-flag properties.
    pub modified_flag_suffix: String,
    /// Suffix appended to entity names to name their audit entities.
    pub audit_entity_suffix: String,
    /// Alias of the queried audit entity.
    pub entity_alias: String,
}

impl Default for AuditConfiguration {
    fn default() -> Self {
        Self {
            original_id_prop_name: "originalId".to_string(),
            revision_field_name: "REV".to_string(),
            revision_number_path: "id".to_string(),
            revision_type_prop_name: "REVTYPE".to_string(),
            modified_flag_suffix: "_MOD".to_string(),
            audit_entity_suffix: "_AUD".to_string(),
            entity_alias: "e".to_string(),
        }
    }
}

impl AuditConfiguration {
    /// Creates a configuration with default names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the original id property name.
    #[must_use]
    pub fn with_original_id_prop_name(mut self, name: impl Into<String>) -> Self {
        self.original_id_prop_name = name.into();
        self
    }

    /// Sets the revision field name.
    #[must_use]
    pub fn with_revision_field_name(mut self, name: impl Into<String>) -> Self {
        self.revision_field_name = name.into();
        self
    }

    /// Sets the revision type property name.
    #[must_use]
    pub fn with_revision_type_prop_name(mut self, name: impl Into<String>) -> Self {
        self.revision_type_prop_name = name.into();
        self
    }

    /// Sets the modified flag suffix.
    #[must_use]
    pub fn with_modified_flag_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.modified_flag_suffix = suffix.into();
        self
    }

    /// Sets the audit entity suffix.
    #[must_use]
    pub fn with_audit_entity_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.audit_entity_suffix = suffix.into();
        self
    }

    /// Sets the queried entity alias.
    #[must_use]
    pub fn with_entity_alias(mut self, alias: impl Into<String>) -> Self {
        self.entity_alias = alias.into();
        self
    }

    /// Path of the revision number, e.g. `originalId.REV.id`.
    pub fn revision_number_path(&self) -> String {
        format!(
            "{}.{}.{}",
            self.original_id_prop_name, self.revision_field_name, self.revision_number_path
        )
    }

    /// Path of a property of the revision entity, e.g. `originalId.REV.timestamp`.
    pub fn revision_property_path(&self, property: &str) -> String {
        format!(
            "{}.{}.{}",
            self.original_id_prop_name, self.revision_field_name, property
        )
    }

    /// Path of an identifier property inside the original id.
    pub fn original_id_path(&self, property: &str) -> String {
        format!("{}.{}", self.original_id_prop_name, property)
    }

    /// Name of the audit entity of `entity`.
    pub fn audit_entity_name(&self, entity: &str) -> String {
        format!("{entity}{}", self.audit_entity_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let config = AuditConfiguration::default();
        assert_eq!(config.revision_number_path(), "originalId.REV.id");
        assert_eq!(config.revision_property_path("timestamp"), "originalId.REV.timestamp");
        assert_eq!(config.original_id_path("id"), "originalId.id");
        assert_eq!(config.audit_entity_name("Person"), "Person_AUD");
    }

    #[test]
    fn builder_pattern() {
        let config = AuditConfiguration::new()
            .with_original_id_prop_name("oid")
            .with_revision_field_name("rev");
        assert_eq!(config.revision_number_path(), "oid.rev.id");
    }

    #[test]
    fn json_roundtrip_keeps_defaults() {
        let config: AuditConfiguration =
            serde_json::from_str(r#"{"audit_entity_suffix":"_HIST"}"#).unwrap();
        assert_eq!(config.audit_entity_name("Person"), "Person_HIST");
        assert_eq!(config.entity_alias, "e");
    }
}
