//! # ormbind Audit
//!
//! Criteria for querying the revision history of audited entities.
//!
//! This crate provides:
//! - Audit configuration: naming of original ids, revision fields and
//!   modified flags
//! - A parameterized where-clause tree and a select builder
//! - Criteria (property, value, range, null, relation and logical) that
//!   resolve property references against entity metadata before writing
//! - [`AuditQuery`], which applies criteria and orderings to the audit
//!   entity of one entity
//!
//! Entity metadata and relation knowledge are supplied by the caller
//! through [`EntityMetadata`] and [`RelationChecker`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod audit_query;
mod config;
pub mod criteria;
mod error;
mod metadata;
pub mod query;

pub use audit_query::AuditQuery;
pub use config::AuditConfiguration;
pub use criteria::{
    AuditConjunction, AuditCriterion, AuditDisjunction, AuditEntity, AuditId, AuditOrder,
    AuditProperty, AuditRelatedId, BetweenAuditExpression, IdentifierEqAuditExpression,
    InAuditExpression, LogicalAuditExpression, NotAuditExpression, NotNullAuditExpression,
    NullAuditExpression, PropertyAuditExpression, PropertyNameGetter, RelatedAuditExpression,
    RevisionType, SimpleAuditExpression,
};
pub use error::{AuditError, AuditResult};
pub use metadata::{
    AuditReader, AuditService, EntityMetadata, RelationChecker, RelationDescription,
};
pub use query::{Connective, ParameterValue, Parameters, QueryBuilder, RenderedQuery};
