//! Claims Domain Ports
//!
//! `ClaimPort` abstracts claim storage. Workflow steps that change a report
//! together with its claims are persisted through
//! [`ClaimPort::save_resolution`], which adapters must apply atomically.

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, Email, PortError, ReportId};

use crate::claim::{Claim, ClaimStatus};
use crate::workflow::Resolution;

/// Conflict message when a stored claim was decided since it was loaded
pub const STALE_CLAIM: &str = "Status klaim sudah berubah, muat ulang halaman";

/// Storage operations for claims
#[async_trait]
pub trait ClaimPort: DomainPort {
    /// Stores a new claim
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` if the claimant already has a pending claim on
    /// the same report
    async fn insert(&self, claim: &Claim) -> Result<(), PortError>;

    /// Retrieves a claim by ID
    async fn get(&self, id: ClaimId) -> Result<Claim, PortError>;

    /// Persists a status change of a single claim
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` if the stored claim is no longer in one of
    /// `claim.status.predecessors()`
    async fn save(&self, claim: &Claim) -> Result<(), PortError>;

    /// Claims filed against one report, oldest first
    async fn list_for_report(&self, report_id: ReportId) -> Result<Vec<Claim>, PortError>;

    /// Claims filed by one user, newest first
    async fn list_by_claimant(&self, claimant: &Email) -> Result<Vec<Claim>, PortError>;

    /// Claims in one status, oldest first
    async fn list_by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, PortError>;

    /// Claims waiting for an admin decision
    async fn list_pending(&self) -> Result<Vec<Claim>, PortError> {
        self.list_by_status(ClaimStatus::Pending).await
    }

    /// Persists a report and its changed claims in one transaction
    ///
    /// Every record is guarded like [`ClaimPort::save`] and
    /// [`domain_report::ReportPort::save`]; if any of them went stale nothing
    /// is written.
    async fn save_resolution(&self, resolution: &Resolution) -> Result<(), PortError>;
}

/// In-memory implementation for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use domain_report::{MockReportPort, ReportPort};

    /// In-memory mock implementation of ClaimPort
    ///
    /// Shares report storage with a [`MockReportPort`] so resolutions update
    /// both sides.
    #[derive(Debug, Clone)]
    pub struct MockClaimPort {
        claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
        reports: MockReportPort,
    }

    impl MockClaimPort {
        /// Creates a new mock port backed by `reports`
        pub fn new(reports: MockReportPort) -> Self {
            Self {
                claims: Arc::default(),
                reports,
            }
        }

        /// Pre-populates with claims for testing
        pub async fn with_claims(reports: MockReportPort, claims: Vec<Claim>) -> Self {
            let port = Self::new(reports);
            {
                let mut map = port.claims.write().await;
                for claim in claims {
                    map.insert(claim.id, claim);
                }
            }
            port
        }

        fn sorted(mut claims: Vec<Claim>, newest_first: bool) -> Vec<Claim> {
            claims.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.as_uuid().cmp(b.id.as_uuid())));
            if newest_first {
                claims.reverse();
            }
            claims
        }
    }

    fn ensure_current(stored: &Claim, update: &Claim) -> Result<(), PortError> {
        if update.status.predecessors().contains(&stored.status) {
            Ok(())
        } else {
            Err(PortError::conflict(STALE_CLAIM))
        }
    }

    impl DomainPort for MockClaimPort {}

    #[async_trait]
    impl ClaimPort for MockClaimPort {
        async fn insert(&self, claim: &Claim) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            let duplicate = claims.values().any(|c| {
                c.report_id == claim.report_id && c.claimant == claim.claimant && c.is_pending()
            });
            if duplicate || claims.contains_key(&claim.id) {
                return Err(PortError::conflict("Klaim untuk laporan ini sudah diajukan"));
            }
            claims.insert(claim.id, claim.clone());
            Ok(())
        }

        async fn get(&self, id: ClaimId) -> Result<Claim, PortError> {
            self.claims
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))
        }

        async fn save(&self, claim: &Claim) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            let existing = claims
                .get_mut(&claim.id)
                .ok_or_else(|| PortError::not_found("Claim", claim.id))?;
            ensure_current(existing, claim)?;
            *existing = claim.clone();
            Ok(())
        }

        async fn list_for_report(&self, report_id: ReportId) -> Result<Vec<Claim>, PortError> {
            let claims = self.claims.read().await;
            let matching = claims.values().filter(|c| c.report_id == report_id).cloned().collect();
            Ok(Self::sorted(matching, false))
        }

        async fn list_by_claimant(&self, claimant: &Email) -> Result<Vec<Claim>, PortError> {
            let claims = self.claims.read().await;
            let matching = claims.values().filter(|c| &c.claimant == claimant).cloned().collect();
            Ok(Self::sorted(matching, true))
        }

        async fn list_by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, PortError> {
            let claims = self.claims.read().await;
            let matching = claims.values().filter(|c| c.status == status).cloned().collect();
            Ok(Self::sorted(matching, false))
        }

        async fn save_resolution(&self, resolution: &Resolution) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            for claim in resolution.claims() {
                let existing = claims
                    .get(&claim.id)
                    .ok_or_else(|| PortError::not_found("Claim", claim.id))?;
                ensure_current(existing, claim)?;
            }
            self.reports.save(&resolution.report).await?;
            for claim in resolution.claims() {
                claims.insert(claim.id, claim.clone());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockClaimPort;
    use super::*;
    use chrono::{Days, Utc};
    use core_kernel::Actor;
    use domain_report::{Laporan, MockReportPort, ReportDraft, ReportKind, ReportPort, ReportStatus};

    use crate::claim::Evidence;
    use crate::workflow::{approve_claim, cancel_report};

    fn user(email: &str) -> Actor {
        Actor::user(Email::parse(email).unwrap())
    }

    fn admin() -> Actor {
        Actor::admin(Email::parse("admin@kampus.ac.id").unwrap())
    }

    fn listed_report() -> Laporan {
        let today = Utc::now().date_naive();
        let draft = ReportDraft {
            item_name: "Payung hitam".to_string(),
            kind: ReportKind::Found,
            location: "Kantin teknik".to_string(),
            event_date: today - Days::new(1),
            description: "Payung lipat".to_string(),
            photo: None,
        };
        let mut report = Laporan::submit(&user("budi@kampus.ac.id"), draft, today).unwrap();
        report.approve(&admin()).unwrap();
        report
    }

    async fn setup() -> (Laporan, MockReportPort, MockClaimPort) {
        let report = listed_report();
        let reports = MockReportPort::with_reports(vec![report.clone()]).await;
        let claims = MockClaimPort::new(reports.clone());
        (report, reports, claims)
    }

    #[tokio::test]
    async fn test_duplicate_pending_insert_conflicts() {
        let (report, _, port) = setup().await;
        let siti = user("siti@kampus.ac.id");

        let first = Claim::file(&report, &[], &siti, "milik saya").unwrap();
        let second = Claim::file(&report, &[], &siti, "milik saya").unwrap();
        port.insert(&first).await.unwrap();

        assert!(port.insert(&second).await.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_save_resolution_updates_report_and_claims() {
        let (report, reports, port) = setup().await;
        let winner = Claim::file(&report, &[], &user("siti@kampus.ac.id"), "milik saya").unwrap();
        let loser = Claim::file(&report, &[], &user("andi@kampus.ac.id"), "punya saya").unwrap();
        port.insert(&winner).await.unwrap();
        port.insert(&loser).await.unwrap();

        let others = port.list_for_report(report.id).await.unwrap();
        let evidence = Some(Evidence::new("bukti/serah-terima.jpg").unwrap());
        let resolution = approve_claim(report.clone(), winner.clone(), others, &admin(), evidence).unwrap();
        port.save_resolution(&resolution).await.unwrap();

        assert_eq!(reports.get(report.id).await.unwrap().status, ReportStatus::Claimed);
        assert_eq!(port.get(winner.id).await.unwrap().status, ClaimStatus::Approved);
        assert_eq!(port.get(loser.id).await.unwrap().status, ClaimStatus::Rejected);
        assert!(port.list_pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_resolution_closes_claims() {
        let (report, reports, port) = setup().await;
        let claim = Claim::file(&report, &[], &user("siti@kampus.ac.id"), "milik saya").unwrap();
        port.insert(&claim).await.unwrap();

        let claims = port.list_for_report(report.id).await.unwrap();
        let resolution = cancel_report(report.clone(), claims, &user("budi@kampus.ac.id")).unwrap();
        port.save_resolution(&resolution).await.unwrap();

        assert_eq!(reports.get(report.id).await.unwrap().status, ReportStatus::Cancelled);
        assert_eq!(port.get(claim.id).await.unwrap().status, ClaimStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_resolution_with_unknown_claim_changes_nothing() {
        let (report, reports, port) = setup().await;
        let stray = Claim::file(&report, &[], &user("siti@kampus.ac.id"), "milik saya").unwrap();

        let evidence = Some(Evidence::new("bukti/x.jpg").unwrap());
        let resolution = approve_claim(report.clone(), stray, vec![], &admin(), evidence).unwrap();

        assert!(port.save_resolution(&resolution).await.unwrap_err().is_not_found());
        assert_eq!(reports.get(report.id).await.unwrap().status, ReportStatus::OnProgress);
    }

    #[tokio::test]
    async fn test_stale_approval_after_cancel_changes_nothing() {
        let (report, reports, port) = setup().await;
        let claim = Claim::file(&report, &[], &user("siti@kampus.ac.id"), "milik saya").unwrap();
        port.insert(&claim).await.unwrap();
        let loaded = port.list_for_report(report.id).await.unwrap();

        let cancelled = cancel_report(report.clone(), loaded.clone(), &user("budi@kampus.ac.id")).unwrap();
        port.save_resolution(&cancelled).await.unwrap();

        // an admin still looking at the page loaded before the cancel
        let evidence = Some(Evidence::new("bukti/telat.jpg").unwrap());
        let approved = approve_claim(report.clone(), claim.clone(), loaded, &admin(), evidence).unwrap();
        assert!(port.save_resolution(&approved).await.unwrap_err().is_conflict());

        assert_eq!(reports.get(report.id).await.unwrap().status, ReportStatus::Cancelled);
        assert_eq!(port.get(claim.id).await.unwrap().status, ClaimStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_save_of_decided_claim_conflicts() {
        let (report, _, port) = setup().await;
        let siti = user("siti@kampus.ac.id");
        let claim = Claim::file(&report, &[], &siti, "milik saya").unwrap();
        port.insert(&claim).await.unwrap();

        let mut withdrawn = claim.clone();
        withdrawn.cancel(&siti).unwrap();
        port.save(&withdrawn).await.unwrap();

        let mut rejected = claim;
        rejected.reject(&admin(), "bukan pemilik").unwrap();
        assert!(port.save(&rejected).await.unwrap_err().is_conflict());
        assert_eq!(port.get(rejected.id).await.unwrap().status, ClaimStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_list_by_claimant() {
        let (report, _, port) = setup().await;
        let siti = user("siti@kampus.ac.id");
        port.insert(&Claim::file(&report, &[], &siti, "milik saya").unwrap()).await.unwrap();
        port.insert(&Claim::file(&report, &[], &user("andi@kampus.ac.id"), "punya saya").unwrap())
            .await
            .unwrap();

        let mine = port.list_by_claimant(&siti.email).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].claimant, siti.email);
    }
}
