//! Claims Domain
//!
//! A claim is a user's assertion that an item listed in a report belongs to
//! them. Admins decide claims: approval requires uploaded evidence of the
//! hand-over, rejection requires a reason. Claimants may withdraw a claim
//! while it is still pending.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Pending -> Approved
//!    │
//!    ├-> Rejected
//!    └-> Cancelled
//! ```
//!
//! Decisions that touch the parent report (approval, report cancellation)
//! go through [`workflow`], which returns every record that must be
//! persisted together.

pub mod claim;
pub mod workflow;
pub mod error;
pub mod ports;

pub use claim::{Claim, ClaimStatus, Evidence};
pub use workflow::{Resolution, approve_claim, cancel_report, SUPERSEDED_REASON, REPORT_CANCELLED_REASON};
pub use error::ClaimError;
pub use ports::{ClaimPort, STALE_CLAIM};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockClaimPort;
