//! Lost-and-Found Report Domain
//!
//! A *laporan* is a report of a lost or found item. Reports submitted by
//! users wait for an admin to verify them; verified reports are listed for
//! everyone and can be claimed.
//!
//! # Report Lifecycle
//!
//! ```text
//! PendingVerification -> OnProgress -> Claimed -> Done
//!          │                  │
//!          ├-> Rejected       │
//!          └-> Cancelled <----┘
//! ```

pub mod report;
pub mod error;
pub mod ports;

pub use report::{Laporan, ReportDraft, ReportKind, ReportStatus};
pub use error::ReportError;
pub use ports::{ReportPort, ReportQuery, StatusCount, STALE_REPORT};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockReportPort;
