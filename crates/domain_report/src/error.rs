//! Report domain errors

use thiserror::Error;

/// Errors that can occur in the report domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Not allowed: {0}")]
    NotAuthorized(String),

    #[error("A rejection reason is required")]
    ReasonRequired,

    #[error("Invalid report: {0}")]
    InvalidDraft(String),
}

impl ReportError {
    pub fn not_authorized(message: impl Into<String>) -> Self {
        ReportError::NotAuthorized(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ReportError::InvalidDraft(message.into())
    }
}
