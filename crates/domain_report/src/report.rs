//! Report aggregate

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{Actor, Email, ReportId};
use crate::error::ReportError;

/// Maximum length of the item name
pub const MAX_ITEM_NAME_LEN: usize = 100;
/// Maximum length of the location
pub const MAX_LOCATION_LEN: usize = 150;
/// Maximum length of the description
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Whether the reporter lost or found the item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Kehilangan
    Lost,
    /// Penemuan
    Found,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Lost => "lost",
            ReportKind::Found => "found",
        }
    }

    /// Label shown in the UI
    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Lost => "Kehilangan",
            ReportKind::Found => "Penemuan",
        }
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lost" | "kehilangan" => Ok(ReportKind::Lost),
            "found" | "penemuan" => Ok(ReportKind::Found),
            other => Err(ReportError::invalid(format!("Jenis laporan tidak dikenal: {other}"))),
        }
    }
}

/// Report status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Submitted, waiting for an admin to verify it
    PendingVerification,
    /// Verified and publicly listed; claims may be filed
    OnProgress,
    /// A claim was approved; waiting for hand-over
    Claimed,
    /// Item handed over
    Done,
    /// Refused during verification
    Rejected,
    /// Withdrawn by its owner
    Cancelled,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 6] = [
        ReportStatus::PendingVerification,
        ReportStatus::OnProgress,
        ReportStatus::Claimed,
        ReportStatus::Done,
        ReportStatus::Rejected,
        ReportStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::PendingVerification => "pending_verification",
            ReportStatus::OnProgress => "on_progress",
            ReportStatus::Claimed => "claimed",
            ReportStatus::Done => "done",
            ReportStatus::Rejected => "rejected",
            ReportStatus::Cancelled => "cancelled",
        }
    }

    /// Label shown in the UI
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::PendingVerification => "Menunggu Verifikasi",
            ReportStatus::OnProgress => "Sedang Diproses",
            ReportStatus::Claimed => "Sudah Diklaim",
            ReportStatus::Done => "Selesai",
            ReportStatus::Rejected => "Ditolak",
            ReportStatus::Cancelled => "Dibatalkan",
        }
    }

    /// No transition leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReportStatus::Done | ReportStatus::Rejected | ReportStatus::Cancelled
        )
    }

    /// Whether a report may move from `self` to `target`
    pub fn can_become(self, target: ReportStatus) -> bool {
        use ReportStatus::*;
        matches!(
            (self, target),
            (PendingVerification, OnProgress) |
            (PendingVerification, Rejected) |
            (PendingVerification, Cancelled) |
            (OnProgress, Claimed) |
            (OnProgress, Cancelled) |
            (Claimed, Done)
        )
    }

    /// Statuses a stored report must still be in for a move to `self`
    ///
    /// Adapters guard updates with this so a decision made on a stale copy
    /// cannot overwrite a newer one.
    pub fn predecessors(self) -> Vec<ReportStatus> {
        Self::ALL
            .into_iter()
            .filter(|from| from.can_become(self))
            .collect()
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ReportError::invalid(format!("Unknown report status: {s}")))
    }
}

/// User input for a new report
#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub item_name: String,
    pub kind: ReportKind,
    pub location: String,
    pub event_date: NaiveDate,
    pub description: String,
    pub photo: Option<String>,
}

impl ReportDraft {
    /// Checks required fields and that the event is not in the future
    pub fn validate(&self, today: NaiveDate) -> Result<(), ReportError> {
        require("Nama barang", &self.item_name, MAX_ITEM_NAME_LEN)?;
        require("Lokasi", &self.location, MAX_LOCATION_LEN)?;
        require("Deskripsi", &self.description, MAX_DESCRIPTION_LEN)?;
        if self.event_date > today {
            return Err(ReportError::invalid(
                "Tanggal kejadian tidak boleh di masa depan",
            ));
        }
        Ok(())
    }
}

fn require(field: &str, value: &str, max_len: usize) -> Result<(), ReportError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ReportError::invalid(format!("{field} wajib diisi")));
    }
    if value.chars().count() > max_len {
        return Err(ReportError::invalid(format!("{field} terlalu panjang")));
    }
    Ok(())
}

/// A lost or found item report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Laporan {
    pub id: ReportId,
    /// Owner's email
    pub owner: Email,
    pub item_name: String,
    pub kind: ReportKind,
    pub location: String,
    pub event_date: NaiveDate,
    pub description: String,
    /// Stored path of the item photo
    pub photo: Option<String>,
    pub status: ReportStatus,
    /// Set when an admin rejects the report
    pub rejection_reason: Option<String>,
    /// Admin who verified or rejected the report
    pub verified_by: Option<Email>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Laporan {
    /// Creates a report from a validated draft
    ///
    /// Reports filed by admins skip verification and start `OnProgress`.
    pub fn submit(owner: &Actor, draft: ReportDraft, today: NaiveDate) -> Result<Self, ReportError> {
        draft.validate(today)?;

        let now = Utc::now();
        let (status, verified_by) = if owner.is_admin() {
            (ReportStatus::OnProgress, Some(owner.email.clone()))
        } else {
            (ReportStatus::PendingVerification, None)
        };

        Ok(Self {
            id: ReportId::generate(),
            owner: owner.email.clone(),
            item_name: draft.item_name.trim().to_string(),
            kind: draft.kind,
            location: draft.location.trim().to_string(),
            event_date: draft.event_date,
            description: draft.description.trim().to_string(),
            photo: draft.photo,
            status,
            rejection_reason: None,
            verified_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Admin verification: the report becomes publicly listed
    pub fn approve(&mut self, actor: &Actor) -> Result<(), ReportError> {
        require_admin(actor, "memverifikasi laporan")?;
        self.transition(ReportStatus::OnProgress)?;
        self.verified_by = Some(actor.email.clone());
        Ok(())
    }

    /// Admin verification: the report is refused with a reason
    pub fn reject(&mut self, actor: &Actor, reason: &str) -> Result<(), ReportError> {
        require_admin(actor, "menolak laporan")?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ReportError::ReasonRequired);
        }
        self.transition(ReportStatus::Rejected)?;
        self.rejection_reason = Some(reason.to_string());
        self.verified_by = Some(actor.email.clone());
        Ok(())
    }

    /// Records that a claim on this report was approved
    pub fn mark_claimed(&mut self) -> Result<(), ReportError> {
        self.transition(ReportStatus::Claimed)
    }

    /// Admin confirms the item was handed over
    pub fn complete(&mut self, actor: &Actor) -> Result<(), ReportError> {
        require_admin(actor, "menyelesaikan laporan")?;
        self.transition(ReportStatus::Done)
    }

    /// The owner withdraws the report
    pub fn cancel(&mut self, actor: &Actor) -> Result<(), ReportError> {
        if !actor.owns(&self.owner) {
            return Err(ReportError::not_authorized(
                "Hanya pemilik laporan yang dapat membatalkan laporan",
            ));
        }
        self.transition(ReportStatus::Cancelled)
    }

    /// Claims may only be filed or approved while the report is listed
    pub fn is_claimable(&self) -> bool {
        self.status == ReportStatus::OnProgress
    }

    fn transition(&mut self, target: ReportStatus) -> Result<(), ReportError> {
        if !self.can_transition_to(target) {
            tracing::debug!(
                report_id = %self.id,
                from = %self.status,
                to = %target,
                "Rejected report status transition"
            );
            return Err(ReportError::InvalidStatusTransition {
                from: self.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn can_transition_to(&self, target: ReportStatus) -> bool {
        self.status.can_become(target)
    }
}

fn require_admin(actor: &Actor, action: &str) -> Result<(), ReportError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(ReportError::not_authorized(format!(
            "Hanya admin yang dapat {action}"
        )))
    }
}
