//! Comparisons of one property with bound values.

use super::property_name::PropertyNameGetter;
use super::tools::{
    check_operator, check_property_not_a_relation, determine_property_name, related_entity,
};
use super::AuditCriterion;
use crate::error::{AuditError, AuditResult};
use crate::metadata::{AuditReader, AuditService};
use crate::query::{Connective, ParameterValue, Parameters, QueryBuilder};
use tracing::trace;

/// `property op :value`.
///
/// A to-one relation may be compared for (in)equality; its id is compared.
#[derive(Debug, Clone)]
pub struct SimpleAuditExpression {
    property: PropertyNameGetter,
    value: ParameterValue,
    op: String,
}

impl SimpleAuditExpression {
    /// Creates `property op value`.
    pub fn new(property: PropertyNameGetter, value: ParameterValue, op: impl Into<String>) -> Self {
        Self {
            property,
            value,
            op: op.into(),
        }
    }
}

impl AuditCriterion for SimpleAuditExpression {
    fn add_to_query(
        &self,
        service: &AuditService,
        reader: &dyn AuditReader,
        entity_name: &str,
        _qb: &mut QueryBuilder,
        parameters: &mut Parameters,
    ) -> AuditResult<()> {
        check_operator(&self.op)?;
        let property_name = determine_property_name(service, reader, entity_name, &self.property)?;
        let left = match related_entity(service, entity_name, &property_name) {
            None => property_name,
            Some(relation) if relation.to_one && (self.op == "=" || self.op == "<>") => {
                format!("{property_name}.{}", relation.target_id_property)
            }
            Some(_) => return Err(AuditError::unsupported_relation(property_name, entity_name)),
        };
        trace!(entity = entity_name, left = %left, op = %self.op, "value comparison");
        parameters.add_where_with_param(&left, &self.op, self.value.clone());
        Ok(())
    }
}

/// `lo <= property <= hi`.
#[derive(Debug, Clone)]
pub struct BetweenAuditExpression {
    property: PropertyNameGetter,
    lo: ParameterValue,
    hi: ParameterValue,
}

impl BetweenAuditExpression {
    /// Creates an inclusive range restriction.
    pub fn new(property: PropertyNameGetter, lo: ParameterValue, hi: ParameterValue) -> Self {
        Self { property, lo, hi }
    }
}

impl AuditCriterion for BetweenAuditExpression {
    fn add_to_query(
        &self,
        service: &AuditService,
        reader: &dyn AuditReader,
        entity_name: &str,
        _qb: &mut QueryBuilder,
        parameters: &mut Parameters,
    ) -> AuditResult<()> {
        let property_name = determine_property_name(service, reader, entity_name, &self.property)?;
        check_property_not_a_relation(service, entity_name, &property_name)?;

        let mut range = parameters.detached(Connective::And);
        range.add_where_with_param(&property_name, ">=", self.lo.clone());
        range.add_where_with_param(&property_name, "<=", self.hi.clone());
        parameters.add_sub_parameters(range);
        Ok(())
    }
}

/// `property in (:v0, :v1, ...)`.
#[derive(Debug, Clone)]
pub struct InAuditExpression {
    property: PropertyNameGetter,
    values: Vec<ParameterValue>,
}

impl InAuditExpression {
    /// Creates a membership restriction.
    pub fn new(property: PropertyNameGetter, values: Vec<ParameterValue>) -> Self {
        Self { property, values }
    }
}

impl AuditCriterion for InAuditExpression {
    fn add_to_query(
        &self,
        service: &AuditService,
        reader: &dyn AuditReader,
        entity_name: &str,
        _qb: &mut QueryBuilder,
        parameters: &mut Parameters,
    ) -> AuditResult<()> {
        if self.values.is_empty() {
            return Err(AuditError::invalid_criterion(
                "an in-restriction needs at least one value",
            ));
        }
        let property_name = determine_property_name(service, reader, entity_name, &self.property)?;
        check_property_not_a_relation(service, entity_name, &property_name)?;
        parameters.add_where_with_params(&property_name, "in", self.values.clone());
        Ok(())
    }
}

/// `property is null`; for a to-one relation, its id is null.
#[derive(Debug, Clone)]
pub struct NullAuditExpression {
    property: PropertyNameGetter,
}

impl NullAuditExpression {
    /// Creates a null restriction.
    pub fn new(property: PropertyNameGetter) -> Self {
        Self { property }
    }
}

impl AuditCriterion for NullAuditExpression {
    fn add_to_query(
        &self,
        service: &AuditService,
        reader: &dyn AuditReader,
        entity_name: &str,
        _qb: &mut QueryBuilder,
        parameters: &mut Parameters,
    ) -> AuditResult<()> {
        let path = nullable_path(service, reader, entity_name, &self.property)?;
        parameters.add_null_restriction(&path);
        Ok(())
    }
}

/// `property is not null`; for a to-one relation, its id is not null.
#[derive(Debug, Clone)]
pub struct NotNullAuditExpression {
    property: PropertyNameGetter,
}

impl NotNullAuditExpression {
    /// Creates a not-null restriction.
    pub fn new(property: PropertyNameGetter) -> Self {
        Self { property }
    }
}

impl AuditCriterion for NotNullAuditExpression {
    fn add_to_query(
        &self,
        service: &AuditService,
        reader: &dyn AuditReader,
        entity_name: &str,
        _qb: &mut QueryBuilder,
        parameters: &mut Parameters,
    ) -> AuditResult<()> {
        let path = nullable_path(service, reader, entity_name, &self.property)?;
        parameters.add_not_null_restriction(&path);
        Ok(())
    }
}

fn nullable_path(
    service: &AuditService,
    reader: &dyn AuditReader,
    entity_name: &str,
    property: &PropertyNameGetter,
) -> AuditResult<String> {
    let property_name = determine_property_name(service, reader, entity_name, property)?;
    match related_entity(service, entity_name, &property_name) {
        None => Ok(property_name),
        Some(relation) if relation.to_one => {
            Ok(format!("{property_name}.{}", relation.target_id_property))
        }
        Some(_) => Err(AuditError::unsupported_relation(property_name, entity_name)),
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
    fn simple_on_scalar() {
        let c = SimpleAuditExpression::new("age".into(), 40.into(), ">");
        assert_eq!(render(&c).unwrap(), "e.age > :_p0");
    }

    #[test]
    fn simple_on_to_one_compares_id() {
        let c = SimpleAuditExpression::new("manager".into(), 7.into(), "=");
        assert_eq!(render(&c).unwrap(), "e.manager.id = :_p0");

        let c = SimpleAuditExpression::new("manager".into(), 7.into(), "<");
        assert!(matches!(
            render(&c),
            Err(AuditError::UnsupportedRelationOperation { .. })
        ));
    }

    #[test]
    fn simple_on_revision_number() {
        let c = SimpleAuditExpression::new(PropertyNameGetter::RevisionNumber, 3.into(), "<=");
        assert_eq!(render(&c).unwrap(), "e.originalId.REV.id <= :_p0");
    }

    #[test]
    fn between_groups_both_bounds() {
        let c = BetweenAuditExpression::new("age".into(), 18.into(), 65.into());
        assert_eq!(render(&c).unwrap(), "(e.age >= :_p0 and e.age <= :_p1)");
    }

    #[test]
    fn in_requires_values() {
        let c = InAuditExpression::new("name".into(), vec!["ann".into(), "bob".into()]);
        assert_eq!(render(&c).unwrap(), "e.name in (:_p0, :_p1)");
        assert!(render(&InAuditExpression::new("name".into(), vec![])).is_err());
        assert!(render(&InAuditExpression::new("friends".into(), vec![1.into()])).is_err());
    }

    #[test]
    fn null_restrictions() {
        assert_eq!(
            render(&NullAuditExpression::new("name".into())).unwrap(),
            "e.name is null"
        );
        assert_eq!(
            render(&NotNullAuditExpression::new("manager".into())).unwrap(),
            "e.manager.id is not null"
        );
        assert!(render(&NullAuditExpression::new("friends".into())).is_err());
    }
}
