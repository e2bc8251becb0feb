//! Queries over the historical rows of one entity.

use crate::criteria::{determine_property_name, AuditCriterion, AuditOrder};
use crate::error::AuditResult;
use crate::metadata::{AuditReader, AuditService};
use crate::query::{Connective, QueryBuilder};
use tracing::debug;

/// Criteria and orderings collected for one audited entity.
#[derive(Debug)]
pub struct AuditQuery {
    entity_name: String,
    criteria: Vec<Box<dyn AuditCriterion>>,
    orders: Vec<AuditOrder>,
}

impl AuditQuery {
    /// Starts a query over the history of `entity_name`.
    pub fn for_entity(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            criteria: Vec::new(),
            orders: Vec::new(),
        }
    }

    /// Returns the queried entity name.
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Adds a criterion; all criteria must hold.
    #[must_use]
    pub fn add(mut self, criterion: impl AuditCriterion + 'static) -> Self {
        self.criteria.push(Box::new(criterion));
        self
    }

    /// Adds an ordering.
    #[must_use]
    pub fn add_order(mut self, order: AuditOrder) -> Self {
        self.orders.push(order);
        self
    }

    /// Builds the query over the audit entity.
    ///
    /// Fails on the first criterion or ordering that cannot be resolved.
    pub fn build(
        &self,
        service: &AuditService,
        reader: &dyn AuditReader,
    ) -> AuditResult<QueryBuilder> {
        let config = service.configuration();
        let mut qb = QueryBuilder::new(
            config.audit_entity_name(&self.entity_name),
            config.entity_alias.as_str(),
        );

        let mut root = qb.root_parameters().detached(Connective::And);
        for criterion in &self.criteria {
            criterion.add_to_query(service, reader, &self.entity_name, &mut qb, &mut root)?;
        }
        for order in &self.orders {
            let property =
                determine_property_name(service, reader, &self.entity_name, order.getter())?;
            qb.add_order(&property, order.is_ascending());
        }
        qb.set_root_parameters(root);

        debug!(
            entity = %self.entity_name,
            criteria = self.criteria.len(),
            orders = self.orders.len(),
            "audit query built"
        );
        Ok(qb)
    }
}
