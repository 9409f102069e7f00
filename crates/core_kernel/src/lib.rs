//! Core Kernel - Foundational types shared across SILAPOR
//!
//! This crate provides the building blocks every domain module depends on:
//! - Strongly-typed identifiers for reports and claims
//! - The `Email` natural key that ties users to their reports and claims
//! - Roles and the acting principal (`Actor`) used for permission checks
//! - The port error type implemented by every storage adapter

pub mod identifiers;
pub mod email;
pub mod role;
pub mod error;
pub mod ports;

pub use identifiers::{ReportId, ClaimId};
pub use email::Email;
pub use role::{Role, Actor};
pub use error::CoreError;
pub use ports::{PortError, DomainPort};
