//! Property-to-property comparison.

use super::property_name::PropertyNameGetter;
use super::tools::{check_operator, check_property_not_a_relation, determine_property_name};
use super::AuditCriterion;
use crate::error::AuditResult;
use crate::metadata::{AuditReader, AuditService};
use crate::query::{Parameters, QueryBuilder};
use tracing::trace;

/// Compares one property of the entity with another: `left op right`.
///
/// Both sides must be scalar; relations cannot be compared this way.
#[derive(Debug, Clone)]
pub struct PropertyAuditExpression {
    property: PropertyNameGetter,
    other_property_name: String,
    op: String,
}

impl PropertyAuditExpression {
    /// Creates `property op other_property_name`.
    pub fn new(
        property: PropertyNameGetter,
        other_property_name: impl Into<String>,
        op: impl Into<String>,
    ) -> Self {
        Self {
            property,
            other_property_name: other_property_name.into(),
            op: op.into(),
        }
    }
}

impl AuditCriterion for PropertyAuditExpression {
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
        check_property_not_a_relation(service, entity_name, &property_name)?;
        check_property_not_a_relation(service, entity_name, &self.other_property_name)?;

        trace!(
            entity = entity_name,
            left = %property_name,
            op = %self.op,
            right = %self.other_property_name,
            "property comparison"
        );
        parameters.add_where(&property_name, &self.op, &self.other_property_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::test_support::{person_catalog, query, service};
    use crate::error::AuditError;
    use crate::query::{Expression, Operand};

    #[test]
    fn scalar_properties_compare() {
        let catalog = person_catalog();
        let service = service(&catalog);
        let (mut qb, mut params) = query();

        PropertyAuditExpression::new("age".into(), "age", "=")
            .add_to_query(&service, catalog.as_ref(), "Person", &mut qb, &mut params)
            .unwrap();

        assert_eq!(
            params.expressions(),
            &[Expression::Comparison {
                left: Operand::Property("age".into()),
                op: "=".into(),
                right: Operand::Property("age".into()),
            }]
        );
    }

    #[test]
    fn relation_on_either_side_is_rejected() {
        let catalog = person_catalog();
        let service = service(&catalog);
        let (mut qb, mut params) = query();

        let err = PropertyAuditExpression::new("manager".into(), "age", "=")
            .add_to_query(&service, catalog.as_ref(), "Person", &mut qb, &mut params)
            .unwrap_err();
        assert_eq!(err, AuditError::unsupported_relation("manager", "Person"));

        let err = PropertyAuditExpression::new("age".into(), "manager", "<>")
            .add_to_query(&service, catalog.as_ref(), "Person", &mut qb, &mut params)
            .unwrap_err();
        assert_eq!(err, AuditError::unsupported_relation("manager", "Person"));
        assert!(params.is_empty());
    }

    #[test]
    fn identifier_is_read_from_original_id() {
        let catalog = person_catalog();
        let service = service(&catalog);
        let (mut qb, mut params) = query();

        PropertyAuditExpression::new("id".into(), "age", "<")
            .add_to_query(&service, catalog.as_ref(), "Person", &mut qb, &mut params)
            .unwrap();
        assert_eq!(params.render().0, "e.originalId.id < e.age");
    }

    #[test]
    fn deferred_property_resolves_per_entity() {
        let catalog = person_catalog();
        let service = service(&catalog);
        let (mut qb, mut params) = query();

        let getter = PropertyNameGetter::deferred(|_| Ok("name".to_string()));
        PropertyAuditExpression::new(getter, "name", "<>")
            .add_to_query(&service, catalog.as_ref(), "Person", &mut qb, &mut params)
            .unwrap();
        assert_eq!(params.render().0, "e.name <> e.name");
    }

    #[test]
    fn unknown_property_and_blank_operator() {
        let catalog = person_catalog();
        let service = service(&catalog);
        let (mut qb, mut params) = query();

        let err = PropertyAuditExpression::new("salary".into(), "age", "=")
            .add_to_query(&service, catalog.as_ref(), "Person", &mut qb, &mut params)
            .unwrap_err();
        assert_eq!(err, AuditError::unresolvable_property("salary", "Person"));

        let err = PropertyAuditExpression::new("age".into(), "age", " ")
            .add_to_query(&service, catalog.as_ref(), "Person", &mut qb, &mut params)
            .unwrap_err();
        assert!(matches!(err, AuditError::InvalidOperator { .. }));

        let err = PropertyAuditExpression::new("age".into(), "age", "=")
            .add_to_query(&service, catalog.as_ref(), "Pet", &mut qb, &mut params)
            .unwrap_err();
        assert_eq!(err, AuditError::unknown_entity("Pet"));
        assert!(params.is_empty());
    }
}
