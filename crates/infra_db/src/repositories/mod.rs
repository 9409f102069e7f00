//! Repository implementations for the domain ports
//!
//! Each repository owns a pool handle, issues runtime-checked SQLx queries,
//! and converts rows into domain aggregates. Errors leave through
//! [`PortError`](core_kernel::PortError) so services never see SQLx types.

pub mod users;
pub mod reports;
pub mod claims;

pub use users::PgUserRepository;
pub use reports::PgReportRepository;
pub use claims::PgClaimRepository;

use core_kernel::{Email, PortError};

use crate::error::DatabaseError;

/// Parses an email column back into the domain type
pub(crate) fn email_column(value: String) -> Result<Email, PortError> {
    Email::parse(&value).map_err(|e| DatabaseError::corrupt("email", e).into())
}

/// Parses an optional email column
pub(crate) fn optional_email_column(value: Option<String>) -> Result<Option<Email>, PortError> {
    value.map(email_column).transpose()
}
