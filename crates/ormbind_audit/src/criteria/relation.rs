//! Identifier-based restrictions.

use super::property_name::PropertyNameGetter;
use super::tools::{determine_property_name, related_entity};
use super::AuditCriterion;
use crate::error::{AuditError, AuditResult};
use crate::metadata::{AuditReader, AuditService};
use crate::query::{ParameterValue, Parameters, QueryBuilder};

fn equality(equals: bool) -> &'static str {
    if equals {
        "="
    } else {
        "<>"
    }
}

/// Restricts the id of the entity a to-one relation points at.
#[derive(Debug, Clone)]
pub struct RelatedAuditExpression {
    property: PropertyNameGetter,
    id: ParameterValue,
    equals: bool,
}

impl RelatedAuditExpression {
    /// Creates `property.id = id` (or `<>` when `equals` is false).
    pub fn new(property: PropertyNameGetter, id: ParameterValue, equals: bool) -> Self {
        Self {
            property,
            id,
            equals,
        }
    }
}

impl AuditCriterion for RelatedAuditExpression {
    fn add_to_query(
        &self,
        service: &AuditService,
        reader: &dyn AuditReader,
        entity_name: &str,
        _qb: &mut QueryBuilder,
        parameters: &mut Parameters,
    ) -> AuditResult<()> {
        let property_name = determine_property_name(service, reader, entity_name, &self.property)?;
        let relation = related_entity(service, entity_name, &property_name)
            .ok_or_else(|| AuditError::relation_required(&property_name, entity_name))?;
        if !relation.to_one {
            return Err(AuditError::unsupported_relation(property_name, entity_name));
        }
        parameters.add_where_with_param(
            &format!("{property_name}.{}", relation.target_id_property),
            equality(self.equals),
            self.id.clone(),
        );
        Ok(())
    }
}

/// Restricts the identifier of the audited entity.
#[derive(Debug, Clone)]
pub struct IdentifierEqAuditExpression {
    id: ParameterValue,
    equals: bool,
}

impl IdentifierEqAuditExpression {
    /// Creates `originalId.<id> = id` (or `<>` when `equals` is false).
    pub fn new(id: ParameterValue, equals: bool) -> Self {
        Self { id, equals }
    }
}

impl AuditCriterion for IdentifierEqAuditExpression {
    fn add_to_query(
        &self,
        service: &AuditService,
        reader: &dyn AuditReader,
        entity_name: &str,
        _qb: &mut QueryBuilder,
        parameters: &mut Parameters,
    ) -> AuditResult<()> {
        let ids = reader
            .entity_metadata()
            .identifier_property_names(entity_name)
            .ok_or_else(|| AuditError::unknown_entity(entity_name))?;
        let [id] = ids.as_slice() else {
            return Err(AuditError::invalid_criterion(format!(
                "entity {entity_name} needs exactly one identifier property, has {}",
                ids.len()
            )));
        };
        let path = service.configuration().original_id_path(id);
        parameters.add_where_with_param(&path, equality(self.equals), self.id.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::test_support::{person_catalog, query, service};

    fn render(criterion: &dyn AuditCriterion) -> AuditResult<String> {
        let catalog = person_catalog();
        let service = service(&catalog);
        let (mut qb, mut params) = query();
        criterion.add_to_query(&service, catalog.as_ref(), "Person", &mut qb, &mut params)?;
        Ok(params.render().0)
    }

    #[test]
    fn related_id() {
        let c = RelatedAuditExpression::new("manager".into(), 4.into(), false);
        assert_eq!(render(&c).unwrap(), "e.manager.id <> :_p0");
    }

    #[test]
    fn related_needs_to_one_relation() {
        let scalar = RelatedAuditExpression::new("age".into(), 4.into(), true);
        assert_eq!(
            render(&scalar).unwrap_err(),
            AuditError::relation_required("age", "Person")
        );
        let to_many = RelatedAuditExpression::new("friends".into(), 4.into(), true);
        assert!(render(&to_many).is_err());
    }

    #[test]
    fn identifier_equality() {
        let c = IdentifierEqAuditExpression::new(11.into(), true);
        assert_eq!(render(&c).unwrap(), "e.originalId.id = :_p0");
    }
}
