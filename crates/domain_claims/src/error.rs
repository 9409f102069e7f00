//! Claims domain errors

use thiserror::Error;

use domain_report::ReportError;

/// Errors that can occur in the claims domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimError {
    #[error("Unknown claim status: {0}")]
    UnknownStatus(String),

    #[error("Report is not open for claims (status: {0})")]
    ReportNotClaimable(String),

    #[error("Claim does not belong to this report")]
    ReportMismatch,

    #[error("Cannot claim your own report")]
    OwnReport,

    #[error("A pending claim for this report already exists")]
    DuplicatePendingClaim,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Not allowed: {0}")]
    NotAuthorized(String),

    #[error("A rejection reason is required")]
    ReasonRequired,

    #[error("Evidence of the hand-over is required")]
    EvidenceRequired,

    #[error("A description of the item is required")]
    DescriptionRequired,

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl ClaimError {
    pub fn not_authorized(message: impl Into<String>) -> Self {
        ClaimError::NotAuthorized(message.into())
    }
}
