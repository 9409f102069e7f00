//! Response view models
//!
//! Each view is the data a page of the web UI renders.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use core_kernel::{ClaimId, Email, ReportId, Role};
use domain_claims::{Claim, ClaimStatus};
use domain_report::{Laporan, ReportKind, ReportStatus, StatusCount};
use domain_user::User;

/// Public URL prefix for stored uploads
pub const UPLOADS_PREFIX: &str = "/uploads";

fn upload_url(path: Option<&str>) -> Option<String> {
    path.map(|p| format!("{UPLOADS_PREFIX}/{p}"))
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub id: ReportId,
    /// Left out of listings shown to visitors who are not signed in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Email>,
    pub item_name: String,
    pub kind: ReportKind,
    pub kind_label: &'static str,
    pub location: String,
    pub event_date: NaiveDate,
    pub description: String,
    pub photo_url: Option<String>,
    pub status: ReportStatus,
    pub status_label: &'static str,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Laporan> for ReportView {
    fn from(report: &Laporan) -> Self {
        Self {
            id: report.id,
            owner: Some(report.owner.clone()),
            item_name: report.item_name.clone(),
            kind: report.kind,
            kind_label: report.kind.label(),
            location: report.location.clone(),
            event_date: report.event_date,
            description: report.description.clone(),
            photo_url: upload_url(report.photo.as_deref()),
            status: report.status,
            status_label: report.status.label(),
            rejection_reason: report.rejection_reason.clone(),
            created_at: report.created_at,
        }
    }
}

impl ReportView {
    /// View for anonymous visitors, without the owner's contact
    pub fn public(report: &Laporan) -> Self {
        Self {
            owner: None,
            ..Self::from(report)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaimView {
    pub id: ClaimId,
    pub report_id: ReportId,
    pub claimant: Email,
    pub description: String,
    pub status: ClaimStatus,
    pub status_label: &'static str,
    pub rejection_reason: Option<String>,
    pub evidence_url: Option<String>,
    pub decided_by: Option<Email>,
    pub created_at: DateTime<Utc>,
}

impl From<&Claim> for ClaimView {
    fn from(claim: &Claim) -> Self {
        Self {
            id: claim.id,
            report_id: claim.report_id,
            claimant: claim.claimant.clone(),
            description: claim.description.clone(),
            status: claim.status,
            status_label: claim.status.label(),
            rejection_reason: claim.rejection_reason.clone(),
            evidence_url: upload_url(claim.evidence.as_ref().map(|e| e.path())),
            decided_by: claim.decided_by.clone(),
            created_at: claim.created_at,
        }
    }
}

/// Account data; never carries the password hash or tokens
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub email: Email,
    pub name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            phone: user.phone.clone(),
            address: user.address.clone(),
            photo_url: upload_url(user.photo.as_deref()),
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

pub fn report_views(reports: &[Laporan]) -> Vec<ReportView> {
    reports.iter().map(ReportView::from).collect()
}

pub fn public_report_views(reports: &[Laporan]) -> Vec<ReportView> {
    reports.iter().map(ReportView::public).collect()
}

pub fn claim_views(claims: &[Claim]) -> Vec<ClaimView> {
    claims.iter().map(ClaimView::from).collect()
}

/// Landing page and student home
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub reports: Vec<ReportView>,
    pub jenis: Option<ReportKind>,
    pub q: Option<String>,
}

/// A user's own reports and claims
#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub reports: Vec<ReportView>,
    pub claims: Vec<ClaimView>,
}

/// Admin verification queue
#[derive(Debug, Clone, Serialize)]
pub struct VerificationView {
    pub reports: Vec<ReportView>,
    pub claims: Vec<ClaimView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusCountView {
    pub status: ReportStatus,
    pub label: &'static str,
    pub count: u64,
}

impl From<&StatusCount> for StatusCountView {
    fn from(count: &StatusCount) -> Self {
        Self {
            status: count.status,
            label: count.status.label(),
            count: count.count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub report_counts: Vec<StatusCountView>,
    pub total_reports: u64,
    pub pending_claims: usize,
    pub users: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub message: String,
}

impl MessageView {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Actor;
    use domain_report::ReportDraft;

    #[test]
    fn test_report_view_links_photo_and_labels() {
        let owner = Actor::user(Email::parse("andi@kampus.ac.id").unwrap());
        let draft = ReportDraft {
            item_name: "Dompet".to_string(),
            kind: ReportKind::Lost,
            location: "Kantin".to_string(),
            event_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            description: "Dompet coklat".to_string(),
            photo: Some("laporan/abc.jpg".to_string()),
        };
        let report = Laporan::submit(&owner, draft, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()).unwrap();

        let view = ReportView::from(&report);
        assert_eq!(view.photo_url.as_deref(), Some("/uploads/laporan/abc.jpg"));
        assert_eq!(view.kind_label, "Kehilangan");
        assert_eq!(view.status_label, "Menunggu Verifikasi");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "pending_verification");
        assert_eq!(json["kind"], "lost");
        assert_eq!(json["owner"], "andi@kampus.ac.id");

        let public = serde_json::to_value(ReportView::public(&report)).unwrap();
        assert!(public.get("owner").is_none());
        assert_eq!(public["item_name"], "Dompet");
    }

    #[test]
    fn test_user_view_hides_secrets() {
        let user = User::admin(Email::parse("admin@kampus.ac.id").unwrap(), "Admin", "hash".to_string());
        let json = serde_json::to_value(UserView::from(&user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "admin");
    }
}
