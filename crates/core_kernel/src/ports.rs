//! Ports and Adapters Infrastructure
//!
//! Each domain crate defines a port trait (`UserPort`, `ReportPort`,
//! `ClaimPort`) describing what it needs from storage. Adapters implement
//! those traits: `infra_db` against PostgreSQL, and in-memory mocks (behind
//! each domain's `mock` feature) for tests.
//!
//! ```text
//!        interface_api services
//!                 │
//!                 ▼
//!   UserPort / ReportPort / ClaimPort   (domain crates)
//!          ▲                  ▲
//!          │                  │
//!   PostgreSQL adapter    Mock adapter
//!      (infra_db)        (feature "mock")
//! ```

use std::fmt;
use thiserror::Error;

type Source = Box<dyn std::error::Error + Send + Sync>;

/// Storage failure as seen by the domain
///
/// Adapters translate their own errors into this type so the API layer maps
/// failures to responses without knowing which adapter is in use.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("{entity} {id} not found")]
    NotFound { entity: String, id: String },

    /// Storage refused the record, e.g. a reference to a missing account
    #[error("Rejected by storage: {message}")]
    Invalid { message: String },

    /// Uniqueness or state conflict (duplicate email, second pending claim)
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Storage cannot be reached right now
    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("Internal storage error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Source>,
    },
}

impl PortError {
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        PortError::Invalid {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        PortError::Unavailable {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an adapter error, keeping it as the source
    pub fn internal_from(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        PortError::Internal {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, PortError::Conflict { .. })
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, PortError::Unavailable { .. })
    }
}

/// Marker trait for all domain ports
///
/// Port traits extend this marker so adapters can be shared as
/// `Arc<dyn Port>` across request handlers.
pub trait DomainPort: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_not_found_names_the_record() {
        let error = PortError::not_found("Laporan", "LAP-123");
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Laporan LAP-123 not found");
    }

    #[test]
    fn test_classification() {
        assert!(PortError::unavailable("pool timed out").is_unavailable());
        assert!(PortError::conflict("email already registered").is_conflict());
        assert!(!PortError::invalid("missing account").is_conflict());
    }

    #[test]
    fn test_internal_from_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let error = PortError::internal_from(io);
        assert!(error.source().is_some());
        assert!(error.to_string().contains("disk gone"));
    }
}
