//! Audit criteria.
//!
//! Each criterion contributes one fragment to the where clause of a query
//! over historical rows. Property references are resolved against the
//! queried entity at that moment, and every criterion validates before it
//! writes, so a rejected criterion leaves the query unchanged.

mod factory;
mod logical;
mod property;
mod property_name;
mod relation;
mod simple;
mod tools;

#[cfg(test)]
pub(crate) mod test_support;

use crate::error::AuditResult;
use crate::metadata::{AuditReader, AuditService};
use crate::query::{Parameters, QueryBuilder};
use std::fmt;

pub use factory::{AuditEntity, AuditId, AuditOrder, AuditProperty, AuditRelatedId, RevisionType};
pub use logical::{AuditConjunction, AuditDisjunction, LogicalAuditExpression, NotAuditExpression};
pub use property::PropertyAuditExpression;
pub use property_name::{DeferredName, PropertyNameGetter};
pub use relation::{IdentifierEqAuditExpression, RelatedAuditExpression};
pub use simple::{
    BetweenAuditExpression, InAuditExpression, NotNullAuditExpression, NullAuditExpression,
    SimpleAuditExpression,
};
pub use tools::{
    check_operator, check_property_not_a_relation, determine_property_name, related_entity,
    IDENTIFIER_PLACEHOLDER,
};

/// A predicate node of an audit query.
pub trait AuditCriterion: fmt::Debug + Send + Sync {
    /// Adds this criterion's fragment to `parameters`.
    ///
    /// `entity_name` is the (non-audit) entity being queried. On error
    /// nothing has been written.
    fn add_to_query(
        &self,
        service: &AuditService,
        reader: &dyn AuditReader,
        entity_name: &str,
        qb: &mut QueryBuilder,
        parameters: &mut Parameters,
    ) -> AuditResult<()>;
}

impl<C: AuditCriterion + ?Sized> AuditCriterion for Box<C> {
    fn add_to_query(
        &self,
        service: &AuditService,
        reader: &dyn AuditReader,
        entity_name: &str,
        qb: &mut QueryBuilder,
        parameters: &mut Parameters,
    ) -> AuditResult<()> {
        (**self).add_to_query(service, reader, entity_name, qb, parameters)
    }
}
