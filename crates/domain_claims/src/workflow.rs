//! Claims workflow
//!
//! Some decisions change more than one record: approving a claim also marks
//! the report claimed and rejects the competing claims, and cancelling a
//! report closes its pending claims. The functions here apply those changes
//! in memory and return a [`Resolution`] that the storage adapter persists
//! in a single transaction.

use serde::{Deserialize, Serialize};

use core_kernel::Actor;
use domain_report::Laporan;

use crate::claim::{Claim, Evidence};
use crate::error::ClaimError;

/// Reason recorded on claims rejected because another claim was approved
pub const SUPERSEDED_REASON: &str = "Barang telah diklaim oleh pengaju lain";

/// Reason recorded on claims closed because the report was cancelled
pub const REPORT_CANCELLED_REASON: &str = "Laporan dibatalkan oleh pemilik";

/// Records changed by one workflow step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub report: Laporan,
    /// The claim the step decided, if the step was about a claim
    pub decided: Option<Claim>,
    /// Claims changed as a side effect (superseded or closed)
    pub affected: Vec<Claim>,
}

impl Resolution {
    /// Every claim whose state changed
    pub fn claims(&self) -> impl Iterator<Item = &Claim> {
        self.decided.iter().chain(self.affected.iter())
    }
}

/// Approves `claim` and settles the report around it
///
/// `others` are the remaining claims on the report; the pending ones are
/// rejected with [`SUPERSEDED_REASON`].
///
/// # Errors
///
/// - `ReportMismatch` if the claim belongs to another report
/// - `ReportNotClaimable` if the report is no longer listed
/// - any error from [`Claim::approve`]
pub fn approve_claim(
    mut report: Laporan,
    mut claim: Claim,
    others: Vec<Claim>,
    actor: &Actor,
    evidence: Option<Evidence>,
) -> Result<Resolution, ClaimError> {
    if claim.report_id != report.id {
        return Err(ClaimError::ReportMismatch);
    }
    if !report.is_claimable() {
        return Err(ClaimError::ReportNotClaimable(report.status.as_str().to_string()));
    }

    claim.approve(actor, evidence)?;
    report.mark_claimed()?;

    let mut affected = Vec::new();
    for mut other in others {
        if other.id == claim.id || other.report_id != report.id || !other.is_pending() {
            continue;
        }
        other.supersede(&actor.email, SUPERSEDED_REASON)?;
        affected.push(other);
    }

    tracing::info!(
        report_id = %report.id,
        claim_id = %claim.id,
        superseded = affected.len(),
        "Claim approved"
    );

    Ok(Resolution {
        report,
        decided: Some(claim),
        affected,
    })
}

/// Cancels `report` on behalf of its owner and closes its pending claims
pub fn cancel_report(
    mut report: Laporan,
    claims: Vec<Claim>,
    actor: &Actor,
) -> Result<Resolution, ClaimError> {
    report.cancel(actor)?;

    let mut closed = Vec::new();
    for mut claim in claims {
        if claim.report_id != report.id || !claim.is_pending() {
            continue;
        }
        claim.close(REPORT_CANCELLED_REASON)?;
        closed.push(claim);
    }

    tracing::info!(report_id = %report.id, closed = closed.len(), "Report cancelled");

    Ok(Resolution {
        report,
        decided: None,
        affected: closed,
    })
}
