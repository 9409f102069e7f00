//! Claim aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{Actor, ClaimId, Email, ReportId};
use domain_report::Laporan;
use crate::error::ClaimError;

/// Maximum length of the claimant's description
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Waiting for an admin decision
    Pending,
    /// Approved; evidence of the hand-over is attached
    Approved,
    /// Rejected by an admin, or superseded by another approved claim
    Rejected,
    /// Withdrawn by the claimant, or closed because the report was cancelled
    Cancelled,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 4] = [
        ClaimStatus::Pending,
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
        ClaimStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
            ClaimStatus::Cancelled => "cancelled",
        }
    }

    /// Label shown in the UI
    pub fn label(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "Menunggu Persetujuan",
            ClaimStatus::Approved => "Disetujui",
            ClaimStatus::Rejected => "Ditolak",
            ClaimStatus::Cancelled => "Dibatalkan",
        }
    }

    /// Only pending claims can be decided or withdrawn
    pub fn can_become(self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self, target),
            (Pending, Approved) |
            (Pending, Rejected) |
            (Pending, Cancelled)
        )
    }

    /// Statuses a stored claim must still be in for a move to `self`
    pub fn predecessors(self) -> Vec<ClaimStatus> {
        Self::ALL
            .into_iter()
            .filter(|from| from.can_become(self))
            .collect()
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClaimStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ClaimError::UnknownStatus(s.to_string()))
    }
}

/// Stored file proving the item was handed over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Evidence(String);

impl Evidence {
    pub fn new(path: impl Into<String>) -> Result<Self, ClaimError> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(ClaimError::EvidenceRequired);
        }
        Ok(Self(path))
    }

    pub fn path(&self) -> &str {
        &self.0
    }
}

/// An ownership claim against a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub report_id: ReportId,
    /// Claimant's email
    pub claimant: Email,
    /// Claimant's description of the item, used to check ownership
    pub description: String,
    pub status: ClaimStatus,
    /// Why the claim was rejected or closed
    pub rejection_reason: Option<String>,
    pub evidence: Option<Evidence>,
    /// Admin who approved or rejected the claim
    pub decided_by: Option<Email>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Files a new claim
    ///
    /// `existing` are the claims already filed against `report`; a claimant
    /// may hold at most one pending claim per report.
    pub fn file(
        report: &Laporan,
        existing: &[Claim],
        claimant: &Actor,
        description: &str,
    ) -> Result<Self, ClaimError> {
        let description = description.trim();
        if description.is_empty() || description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ClaimError::DescriptionRequired);
        }
        if !report.is_claimable() {
            return Err(ClaimError::ReportNotClaimable(report.status.as_str().to_string()));
        }
        if claimant.owns(&report.owner) {
            return Err(ClaimError::OwnReport);
        }
        let already_pending = existing.iter().any(|c| {
            c.report_id == report.id && c.claimant == claimant.email && c.is_pending()
        });
        if already_pending {
            return Err(ClaimError::DuplicatePendingClaim);
        }

        let now = Utc::now();
        Ok(Self {
            id: ClaimId::generate(),
            report_id: report.id,
            claimant: claimant.email.clone(),
            description: description.to_string(),
            status: ClaimStatus::Pending,
            rejection_reason: None,
            evidence: None,
            decided_by: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// The claimant withdraws a pending claim
    pub fn cancel(&mut self, actor: &Actor) -> Result<(), ClaimError> {
        if !actor.owns(&self.claimant) {
            return Err(ClaimError::not_authorized(
                "Hanya pengaju klaim yang dapat membatalkan klaim",
            ));
        }
        self.transition(ClaimStatus::Cancelled)
    }

    /// Admin approval; evidence of the hand-over is mandatory
    ///
    /// Use [`crate::workflow::approve_claim`] to also update the report and
    /// competing claims.
    pub fn approve(&mut self, actor: &Actor, evidence: Option<Evidence>) -> Result<(), ClaimError> {
        require_admin(actor)?;
        let evidence = evidence.ok_or(ClaimError::EvidenceRequired)?;
        self.transition(ClaimStatus::Approved)?;
        self.evidence = Some(evidence);
        self.decided_by = Some(actor.email.clone());
        Ok(())
    }

    /// Admin rejection; a reason is mandatory
    pub fn reject(&mut self, actor: &Actor, reason: &str) -> Result<(), ClaimError> {
        require_admin(actor)?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ClaimError::ReasonRequired);
        }
        self.transition(ClaimStatus::Rejected)?;
        self.rejection_reason = Some(reason.to_string());
        self.decided_by = Some(actor.email.clone());
        Ok(())
    }

    /// Rejects a competing claim after another claim was approved
    pub(crate) fn supersede(&mut self, decided_by: &Email, reason: &str) -> Result<(), ClaimError> {
        self.transition(ClaimStatus::Rejected)?;
        self.rejection_reason = Some(reason.to_string());
        self.decided_by = Some(decided_by.clone());
        Ok(())
    }

    /// Closes a pending claim because its report was withdrawn
    pub(crate) fn close(&mut self, reason: &str) -> Result<(), ClaimError> {
        self.transition(ClaimStatus::Cancelled)?;
        self.rejection_reason = Some(reason.to_string());
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.status == ClaimStatus::Pending
    }

    fn transition(&mut self, target: ClaimStatus) -> Result<(), ClaimError> {
        if !self.can_transition_to(target) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn can_transition_to(&self, target: ClaimStatus) -> bool {
        self.status.can_become(target)
    }
}

fn require_admin(actor: &Actor) -> Result<(), ClaimError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(ClaimError::not_authorized("Hanya admin yang dapat memutuskan klaim"))
    }
}
