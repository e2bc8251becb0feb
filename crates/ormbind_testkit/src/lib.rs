//! # ormbind Testkit
//!
//! Test utilities for ormbind.
//!
//! This crate provides:
//! - In-memory entity metadata for audit queries
//! - A type resolver that records what it was asked
//! - Mapping fixtures: entity classes, collection bindings, audit services
//! - Property-based test generators using proptest
//! - Tracing setup for tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ormbind_testkit::prelude::*;
//!
//! #[test]
//! fn builds_person() {
//!     let binding = person_state().build(&Config::default(), &TypeFactory).unwrap();
//!     assert_eq!(binding.class_name(), PERSON);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod logging;
pub mod metadata;
pub mod resolver;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::logging::*;
    pub use crate::metadata::*;
    pub use crate::resolver::*;
    pub use ormbind_audit::{AuditConfiguration, AuditEntity, AuditQuery, AuditService};
    pub use ormbind_core::{Config, TypeFactory};
}

pub use fixtures::*;
pub use generators::*;
pub use logging::*;
pub use metadata::*;
pub use resolver::*;
