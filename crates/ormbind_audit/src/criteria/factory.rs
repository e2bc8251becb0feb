//! Fluent construction of criteria.
//!
//! ```ignore
//! use ormbind_audit::AuditEntity;
//!
//! let adults_named_like_boss = AuditEntity::conjunction()
//!     .add(AuditEntity::property("age").ge(18))
//!     .add(AuditEntity::property("name").eq_property("bossName"));
//! ```

use super::logical::{
    AuditConjunction, AuditDisjunction, LogicalAuditExpression, NotAuditExpression,
};
use super::property::PropertyAuditExpression;
use super::property_name::PropertyNameGetter;
use super::relation::{IdentifierEqAuditExpression, RelatedAuditExpression};
use super::simple::{
    BetweenAuditExpression, InAuditExpression, NotNullAuditExpression, NullAuditExpression,
    SimpleAuditExpression,
};
use super::tools::IDENTIFIER_PLACEHOLDER;
use super::AuditCriterion;
use crate::error::AuditResult;
use crate::query::{Connective, ParameterValue};

/// Kind of change a revision recorded for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevisionType {
    /// The entity was created.
    Add,
    /// The entity was modified.
    Mod,
    /// The entity was deleted.
    Del,
}

impl RevisionType {
    /// Stored representation.
    pub const fn representation(self) -> i64 {
        match self {
            Self::Add => 0,
            Self::Mod => 1,
            Self::Del => 2,
        }
    }
}

impl From<RevisionType> for ParameterValue {
    fn from(value: RevisionType) -> Self {
        Self::Integer(value.representation())
    }
}

/// Entry point for building criteria.
pub struct AuditEntity;

impl AuditEntity {
    /// The identifier of the audited entity.
    pub fn id() -> AuditId {
        AuditId
    }

    /// A property of the audited entity.
    pub fn property(name: impl Into<String>) -> AuditProperty {
        AuditProperty::new(PropertyNameGetter::Entity(name.into()))
    }

    /// A property of the audited entity, named per queried entity type.
    pub fn deferred_property<F>(resolve: F) -> AuditProperty
    where
        F: Fn(&str) -> AuditResult<String> + Send + Sync + 'static,
    {
        AuditProperty::new(PropertyNameGetter::deferred(resolve))
    }

    /// The revision number.
    pub fn revision_number() -> AuditProperty {
        AuditProperty::new(PropertyNameGetter::RevisionNumber)
    }

    /// A property of the revision entity.
    pub fn revision_property(name: impl Into<String>) -> AuditProperty {
        AuditProperty::new(PropertyNameGetter::RevisionProperty(name.into()))
    }

    /// The revision type.
    pub fn revision_type() -> AuditProperty {
        AuditProperty::new(PropertyNameGetter::RevisionType)
    }

    /// The id of the entity a to-one relation points at.
    pub fn related_id(property: impl Into<String>) -> AuditRelatedId {
        AuditRelatedId {
            property: PropertyNameGetter::Entity(property.into()),
        }
    }

    /// `lhs and rhs`.
    pub fn and(
        lhs: impl AuditCriterion + 'static,
        rhs: impl AuditCriterion + 'static,
    ) -> LogicalAuditExpression {
        LogicalAuditExpression::new(Box::new(lhs), Box::new(rhs), Connective::And)
    }

    /// `lhs or rhs`.
    pub fn or(
        lhs: impl AuditCriterion + 'static,
        rhs: impl AuditCriterion + 'static,
    ) -> LogicalAuditExpression {
        LogicalAuditExpression::new(Box::new(lhs), Box::new(rhs), Connective::Or)
    }

    /// `not criterion`.
    pub fn not(criterion: impl AuditCriterion + 'static) -> NotAuditExpression {
        NotAuditExpression::new(Box::new(criterion))
    }

    /// An empty conjunction.
    pub fn conjunction() -> AuditConjunction {
        AuditConjunction::new()
    }

    /// An empty disjunction.
    pub fn disjunction() -> AuditDisjunction {
        AuditDisjunction::new()
    }
}

/// Criteria over one property.
#[derive(Debug, Clone)]
pub struct AuditProperty {
    getter: PropertyNameGetter,
}

impl AuditProperty {
    /// Wraps a property reference.
    pub fn new(getter: PropertyNameGetter) -> Self {
        Self { getter }
    }

    /// Returns the property reference.
    pub fn getter(&self) -> &PropertyNameGetter {
        &self.getter
    }

    fn compare(&self, value: impl Into<ParameterValue>, op: &str) -> SimpleAuditExpression {
        SimpleAuditExpression::new(self.getter.clone(), value.into(), op)
    }

    fn compare_property(&self, other: impl Into<String>, op: &str) -> PropertyAuditExpression {
        PropertyAuditExpression::new(self.getter.clone(), other, op)
    }

    /// `property = value`.
    pub fn eq(&self, value: impl Into<ParameterValue>) -> SimpleAuditExpression {
        self.compare(value, "=")
    }

    /// `property <> value`.
    pub fn ne(&self, value: impl Into<ParameterValue>) -> SimpleAuditExpression {
        self.compare(value, "<>")
    }

    /// `property < value`.
    pub fn lt(&self, value: impl Into<ParameterValue>) -> SimpleAuditExpression {
        self.compare(value, "<")
    }

    /// `property <= value`.
    pub fn le(&self, value: impl Into<ParameterValue>) -> SimpleAuditExpression {
        self.compare(value, "<=")
    }

    /// `property > value`.
    pub fn gt(&self, value: impl Into<ParameterValue>) -> SimpleAuditExpression {
        self.compare(value, ">")
    }

    /// `property >= value`.
    pub fn ge(&self, value: impl Into<ParameterValue>) -> SimpleAuditExpression {
        self.compare(value, ">=")
    }

    /// `property like pattern`.
    pub fn like(&self, pattern: impl Into<String>) -> SimpleAuditExpression {
        self.compare(pattern.into(), "like")
    }

    /// `lo <= property <= hi`.
    pub fn between(
        &self,
        lo: impl Into<ParameterValue>,
        hi: impl Into<ParameterValue>,
    ) -> BetweenAuditExpression {
        BetweenAuditExpression::new(self.getter.clone(), lo.into(), hi.into())
    }

    /// `property in (values)`.
    pub fn in_<I, V>(&self, values: I) -> InAuditExpression
    where
        I: IntoIterator<Item = V>,
        V: Into<ParameterValue>,
    {
        InAuditExpression::new(
            self.getter.clone(),
            values.into_iter().map(Into::into).collect(),
        )
    }

    /// `property is null`.
    pub fn is_null(&self) -> NullAuditExpression {
        NullAuditExpression::new(self.getter.clone())
    }

    /// `property is not null`.
    pub fn is_not_null(&self) -> NotNullAuditExpression {
        NotNullAuditExpression::new(self.getter.clone())
    }

    /// `property = other`.
    pub fn eq_property(&self, other: impl Into<String>) -> PropertyAuditExpression {
        self.compare_property(other, "=")
    }

    /// `property <> other`.
    pub fn ne_property(&self, other: impl Into<String>) -> PropertyAuditExpression {
        self.compare_property(other, "<>")
    }

    /// `property < other`.
    pub fn lt_property(&self, other: impl Into<String>) -> PropertyAuditExpression {
        self.compare_property(other, "<")
    }

    /// `property <= other`.
    pub fn le_property(&self, other: impl Into<String>) -> PropertyAuditExpression {
        self.compare_property(other, "<=")
    }

    /// `property > other`.
    pub fn gt_property(&self, other: impl Into<String>) -> PropertyAuditExpression {
        self.compare_property(other, ">")
    }

    /// `property >= other`.
    pub fn ge_property(&self, other: impl Into<String>) -> PropertyAuditExpression {
        self.compare_property(other, ">=")
    }

    /// The property changed in the revision.
    pub fn has_changed(&self) -> SimpleAuditExpression {
        SimpleAuditExpression::new(
            PropertyNameGetter::ModifiedFlag(Box::new(self.getter.clone())),
            true.into(),
            "=",
        )
    }

    /// The property did not change in the revision.
    pub fn has_not_changed(&self) -> SimpleAuditExpression {
        SimpleAuditExpression::new(
            PropertyNameGetter::ModifiedFlag(Box::new(self.getter.clone())),
            false.into(),
            "=",
        )
    }

    /// Ascending order on this property.
    pub fn asc(&self) -> AuditOrder {
        AuditOrder {
            getter: self.getter.clone(),
            ascending: true,
        }
    }

    /// Descending order on this property.
    pub fn desc(&self) -> AuditOrder {
        AuditOrder {
            getter: self.getter.clone(),
            ascending: false,
        }
    }
}

/// Criteria over the audited entity's identifier.
#[derive(Debug, Clone, Copy)]
pub struct AuditId;

impl AuditId {
    /// `id = value`.
    pub fn eq(&self, id: impl Into<ParameterValue>) -> IdentifierEqAuditExpression {
        IdentifierEqAuditExpression::new(id.into(), true)
    }

    /// `id <> value`.
    pub fn ne(&self, id: impl Into<ParameterValue>) -> IdentifierEqAuditExpression {
        IdentifierEqAuditExpression::new(id.into(), false)
    }

    /// The identifier as a property, for range and null criteria.
    pub fn property(&self) -> AuditProperty {
        AuditProperty::new(PropertyNameGetter::Entity(IDENTIFIER_PLACEHOLDER.to_string()))
    }
}

/// Criteria over the id a to-one relation points at.
#[derive(Debug, Clone)]
pub struct AuditRelatedId {
    property: PropertyNameGetter,
}

impl AuditRelatedId {
    /// `relation.id = id`.
    pub fn eq(&self, id: impl Into<ParameterValue>) -> RelatedAuditExpression {
        RelatedAuditExpression::new(self.property.clone(), id.into(), true)
    }

    /// `relation.id <> id`.
    pub fn ne(&self, id: impl Into<ParameterValue>) -> RelatedAuditExpression {
        RelatedAuditExpression::new(self.property.clone(), id.into(), false)
    }
}

/// Ordering of query results by one property.
#[derive(Debug, Clone)]
pub struct AuditOrder {
    getter: PropertyNameGetter,
    ascending: bool,
}

impl AuditOrder {
    /// Returns the property reference.
    pub fn getter(&self) -> &PropertyNameGetter {
        &self.getter
    }

    /// Returns true for ascending order.
    pub fn is_ascending(&self) -> bool {
        self.ascending
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
    fn property_comparisons() {
        assert_eq!(
            render(&AuditEntity::property("age").ge(18)).unwrap(),
            "e.age >= :_p0"
        );
        assert_eq!(
            render(&AuditEntity::property("age").lt_property("age")).unwrap(),
            "e.age < e.age"
        );
        assert_eq!(
            render(&AuditEntity::property("name").in_(["a", "b", "c"])).unwrap(),
            "e.name in (:_p0, :_p1, :_p2)"
        );
    }

    #[test]
    fn modified_flags() {
        assert_eq!(
            render(&AuditEntity::property("name").has_changed()).unwrap(),
            "e.name_MOD = :_p0"
        );
        assert!(render(&AuditEntity::property("salary").has_changed()).is_err());
    }

    #[test]
    fn identifier_as_property() {
        assert_eq!(
            render(&AuditEntity::id().property().between(1, 9)).unwrap(),
            "(e.originalId.id >= :_p0 and e.originalId.id <= :_p1)"
        );
    }

    #[test]
    fn revision_criteria() {
        assert_eq!(
            render(&AuditEntity::revision_type().ne(RevisionType::Del)).unwrap(),
            "e.REVTYPE <> :_p0"
        );
        assert_eq!(
            render(&AuditEntity::revision_property("timestamp").gt(0)).unwrap(),
            "e.originalId.REV.timestamp > :_p0"
        );
    }

    #[test]
    fn combinators() {
        let c = AuditEntity::or(
            AuditEntity::related_id("manager").eq(1),
            AuditEntity::not(AuditEntity::property("name").is_not_null()),
        );
        assert_eq!(
            render(&c).unwrap(),
            "(e.manager.id = :_p0 or (not (e.name is not null)))"
        );
    }
}
