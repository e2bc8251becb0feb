//! Boolean combinators.
//!
//! Children write into a detached group that is attached only once every
//! child succeeded, so a failing child leaves the caller's group untouched.

use super::AuditCriterion;
use crate::error::AuditResult;
use crate::metadata::{AuditReader, AuditService};
use crate::query::{Connective, Parameters, QueryBuilder};

/// `lhs and rhs` or `lhs or rhs`.
#[derive(Debug)]
pub struct LogicalAuditExpression {
    lhs: Box<dyn AuditCriterion>,
    rhs: Box<dyn AuditCriterion>,
    connective: Connective,
}

impl LogicalAuditExpression {
    /// Joins two criteria.
    pub fn new(
        lhs: Box<dyn AuditCriterion>,
        rhs: Box<dyn AuditCriterion>,
        connective: Connective,
    ) -> Self {
        Self {
            lhs,
            rhs,
            connective,
        }
    }
}

impl AuditCriterion for LogicalAuditExpression {
    fn add_to_query(
        &self,
        service: &AuditService,
        reader: &dyn AuditReader,
        entity_name: &str,
        qb: &mut QueryBuilder,
        parameters: &mut Parameters,
    ) -> AuditResult<()> {
        let mut group = parameters.detached(self.connective);
        self.lhs
            .add_to_query(service, reader, entity_name, qb, &mut group)?;
        self.rhs
            .add_to_query(service, reader, entity_name, qb, &mut group)?;
        parameters.add_sub_parameters(group);
        Ok(())
    }
}

/// `not (criterion)`.
#[derive(Debug)]
pub struct NotAuditExpression {
    criterion: Box<dyn AuditCriterion>,
}

impl NotAuditExpression {
    /// Negates a criterion.
    pub fn new(criterion: Box<dyn AuditCriterion>) -> Self {
        Self { criterion }
    }
}

impl AuditCriterion for NotAuditExpression {
    fn add_to_query(
        &self,
        service: &AuditService,
        reader: &dyn AuditReader,
        entity_name: &str,
        qb: &mut QueryBuilder,
        parameters: &mut Parameters,
    ) -> AuditResult<()> {
        let mut group = parameters.detached(Connective::And);
        self.criterion
            .add_to_query(service, reader, entity_name, qb, &mut group)?;
        parameters.add_sub_parameters(group.negated());
        Ok(())
    }
}

/// Criteria that must all hold. Empty, it always holds.
#[derive(Debug, Default)]
pub struct AuditConjunction {
    criteria: Vec<Box<dyn AuditCriterion>>,
}

impl AuditConjunction {
    /// Creates an empty conjunction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a criterion.
    #[must_use]
    pub fn add(mut self, criterion: impl AuditCriterion + 'static) -> Self {
        self.criteria.push(Box::new(criterion));
        self
    }
}

impl AuditCriterion for AuditConjunction {
    fn add_to_query(
        &self,
        service: &AuditService,
        reader: &dyn AuditReader,
        entity_name: &str,
        qb: &mut QueryBuilder,
        parameters: &mut Parameters,
    ) -> AuditResult<()> {
        let mut group = parameters.detached(Connective::And);
        if self.criteria.is_empty() {
            group.add_where_literal("1", "=", "1");
        }
        for criterion in &self.criteria {
            criterion.add_to_query(service, reader, entity_name, qb, &mut group)?;
        }
        parameters.add_sub_parameters(group);
        Ok(())
    }
}

/// Criteria of which one must hold. Empty, it never holds.
#[derive(Debug, Default)]
pub struct AuditDisjunction {
    criteria: Vec<Box<dyn AuditCriterion>>,
}

impl AuditDisjunction {
    /// Creates an empty disjunction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a criterion.
    #[must_use]
    pub fn add(mut self, criterion: impl AuditCriterion + 'static) -> Self {
        self.criteria.push(Box::new(criterion));
        self
    }
}

impl AuditCriterion for AuditDisjunction {
    fn add_to_query(
        &self,
        service: &AuditService,
        reader: &dyn AuditReader,
        entity_name: &str,
        qb: &mut QueryBuilder,
        parameters: &mut Parameters,
    ) -> AuditResult<()> {
        let mut group = parameters.detached(Connective::Or);
        if self.criteria.is_empty() {
            group.add_where_literal("0", "=", "1");
        }
        for criterion in &self.criteria {
            criterion.add_to_query(service, reader, entity_name, qb, &mut group)?;
        }
        parameters.add_sub_parameters(group);
        Ok(())
    }
}
