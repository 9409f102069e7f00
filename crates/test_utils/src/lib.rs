//! Test Utilities Crate
//!
//! Shared test infrastructure, fixtures, and helpers for the SILAPOR test
//! suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built accounts, drafts and dates
//! - `builders`: Builders that walk reports and claims to any status
//! - `database`: PostgreSQL test containers with migrations applied
//! - `assertions`: Assertions for the report/claim invariants
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
