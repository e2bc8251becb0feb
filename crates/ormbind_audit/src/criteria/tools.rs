//! Shared resolution and validation steps of criteria.

use super::property_name::PropertyNameGetter;
use crate::config::AuditConfiguration;
use crate::error::{AuditError, AuditResult};
use crate::metadata::{AuditReader, AuditService, EntityMetadata, RelationDescription};

/// Property name standing for "the identifier, whatever it is called".
pub const IDENTIFIER_PLACEHOLDER: &str = "$$id$$";

/// Resolves `getter` to the canonical property name on `entity_name`.
///
/// Identifier properties live inside the original id of an audit row and
/// are prefixed accordingly. Entity properties must exist on the entity.
pub fn determine_property_name(
    service: &AuditService,
    reader: &dyn AuditReader,
    entity_name: &str,
    getter: &PropertyNameGetter,
) -> AuditResult<String> {
    let config = service.configuration();
    let metadata = reader.entity_metadata();
    match getter {
        PropertyNameGetter::Entity(_) | PropertyNameGetter::Deferred(_) => {
            let name = getter.property_name(config, entity_name)?;
            resolve_entity_property(config, metadata, entity_name, &name)
        }
        PropertyNameGetter::ModifiedFlag(inner) => {
            let base = inner.property_name(config, entity_name)?;
            if inner.is_entity_property() {
                ensure_property(metadata, entity_name, &base)?;
            }
            Ok(format!("{base}{}", config.modified_flag_suffix))
        }
        PropertyNameGetter::RevisionNumber
        | PropertyNameGetter::RevisionProperty(_)
        | PropertyNameGetter::RevisionType => getter.property_name(config, entity_name),
    }
}

fn resolve_entity_property(
    config: &AuditConfiguration,
    metadata: &dyn EntityMetadata,
    entity_name: &str,
    name: &str,
) -> AuditResult<String> {
    let ids = metadata
        .identifier_property_names(entity_name)
        .ok_or_else(|| AuditError::unknown_entity(entity_name))?;

    if name == IDENTIFIER_PLACEHOLDER {
        let id = ids.first().ok_or_else(|| {
            AuditError::invalid_criterion(format!("entity {entity_name} has no identifier"))
        })?;
        return Ok(config.original_id_path(id));
    }
    if ids.iter().any(|id| id == name) {
        return Ok(config.original_id_path(name));
    }
    if !metadata.has_property(entity_name, name) {
        return Err(AuditError::unresolvable_property(name, entity_name));
    }
    Ok(name.to_string())
}

fn ensure_property(
    metadata: &dyn EntityMetadata,
    entity_name: &str,
    name: &str,
) -> AuditResult<()> {
    if metadata.identifier_property_names(entity_name).is_none() {
        return Err(AuditError::unknown_entity(entity_name));
    }
    if !metadata.has_property(entity_name, name) {
        return Err(AuditError::unresolvable_property(name, entity_name));
    }
    Ok(())
}

/// Fails if `property` is a relation of `entity_name`.
pub fn check_property_not_a_relation(
    service: &AuditService,
    entity_name: &str,
    property: &str,
) -> AuditResult<()> {
    if service.relations().is_relation(entity_name, property) {
        return Err(AuditError::unsupported_relation(property, entity_name));
    }
    Ok(())
}

/// Describes `property` of `entity_name` if it is a relation.
pub fn related_entity(
    service: &AuditService,
    entity_name: &str,
    property: &str,
) -> Option<RelationDescription> {
    service.relations().relation(entity_name, property)
}

/// Fails on a blank operator token.
pub fn check_operator(op: &str) -> AuditResult<()> {
    if op.trim().is_empty() {
        return Err(AuditError::invalid_operator(op));
    }
    Ok(())
}
