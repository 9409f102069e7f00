//! Report Domain Ports
//!
//! `ReportPort` abstracts report storage. The PostgreSQL adapter lives in
//! `infra_db`; `MockReportPort` (feature `mock`) keeps reports in memory.

use async_trait::async_trait;
use serde::Serialize;

use core_kernel::{DomainPort, Email, PortError, ReportId};

use crate::report::{Laporan, ReportKind, ReportStatus};

/// Query parameters for finding reports
#[derive(Debug, Clone, Default)]
pub struct ReportQuery {
    /// Filter by status
    pub status: Option<ReportStatus>,
    /// Filter by kind (lost/found)
    pub kind: Option<ReportKind>,
    /// Filter by owner
    pub owner: Option<Email>,
    /// Case-insensitive match on item name, location, or description
    pub search: Option<String>,
    /// Limit results
    pub limit: Option<u32>,
}

impl ReportQuery {
    /// Creates a query for one status
    pub fn by_status(status: ReportStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Creates a query for one owner's reports
    pub fn by_owner(owner: Email) -> Self {
        Self {
            owner: Some(owner),
            ..Default::default()
        }
    }

    pub fn kind(mut self, kind: Option<ReportKind>) -> Self {
        self.kind = kind;
        self
    }

    /// Blank search strings are ignored
    pub fn search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if `report` satisfies every filter
    pub fn matches(&self, report: &Laporan) -> bool {
        if self.status.is_some_and(|s| s != report.status) {
            return false;
        }
        if self.kind.is_some_and(|k| k != report.kind) {
            return false;
        }
        if self.owner.as_ref().is_some_and(|o| o != &report.owner) {
            return false;
        }
        if let Some(ref needle) = self.search {
            let needle = needle.to_lowercase();
            let hit = [&report.item_name, &report.location, &report.description]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Number of reports in one status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ReportStatus,
    pub count: u64,
}

/// Conflict message when a stored report moved on since it was loaded
pub const STALE_REPORT: &str = "Status laporan sudah berubah, muat ulang halaman";

/// Storage operations for reports
#[async_trait]
pub trait ReportPort: DomainPort {
    /// Stores a new report
    async fn insert(&self, report: &Laporan) -> Result<(), PortError>;

    /// Retrieves a report by ID
    async fn get(&self, id: ReportId) -> Result<Laporan, PortError>;

    /// Persists a status change of an existing report
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` if the stored report is no longer in one of
    /// `report.status.predecessors()`
    async fn save(&self, report: &Laporan) -> Result<(), PortError>;

    /// Finds reports matching the query, newest first
    async fn find(&self, query: ReportQuery) -> Result<Vec<Laporan>, PortError>;

    /// Counts reports per status; statuses without reports report zero
    async fn status_counts(&self) -> Result<Vec<StatusCount>, PortError>;
}

/// In-memory implementation for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of ReportPort
    #[derive(Debug, Default, Clone)]
    pub struct MockReportPort {
        reports: Arc<RwLock<HashMap<ReportId, Laporan>>>,
    }

    impl MockReportPort {
        /// Creates a new mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with reports for testing
        pub async fn with_reports(reports: Vec<Laporan>) -> Self {
            let port = Self::new();
            {
                let mut map = port.reports.write().await;
                for report in reports {
                    map.insert(report.id, report);
                }
            }
            port
        }
    }

    impl DomainPort for MockReportPort {}

    #[async_trait]
    impl ReportPort for MockReportPort {
        async fn insert(&self, report: &Laporan) -> Result<(), PortError> {
            let mut reports = self.reports.write().await;
            if reports.contains_key(&report.id) {
                return Err(PortError::conflict(format!("Laporan {} already exists", report.id)));
            }
            reports.insert(report.id, report.clone());
            Ok(())
        }

        async fn get(&self, id: ReportId) -> Result<Laporan, PortError> {
            self.reports
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Laporan", id))
        }

        async fn save(&self, report: &Laporan) -> Result<(), PortError> {
            let mut reports = self.reports.write().await;
            match reports.get_mut(&report.id) {
                Some(existing) if report.status.predecessors().contains(&existing.status) => {
                    *existing = report.clone();
                    Ok(())
                }
                Some(_) => Err(PortError::conflict(STALE_REPORT)),
                None => Err(PortError::not_found("Laporan", report.id)),
            }
        }

        async fn find(&self, query: ReportQuery) -> Result<Vec<Laporan>, PortError> {
            let reports = self.reports.read().await;
            let mut results: Vec<Laporan> = reports
                .values()
                .filter(|r| query.matches(r))
                .cloned()
                .collect();
            results.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.as_uuid().cmp(a.id.as_uuid())));
            if let Some(limit) = query.limit {
                results.truncate(limit as usize);
            }
            Ok(results)
        }

        async fn status_counts(&self) -> Result<Vec<StatusCount>, PortError> {
            let reports = self.reports.read().await;
            Ok(ReportStatus::ALL
                .into_iter()
                .map(|status| StatusCount {
                    status,
                    count: reports.values().filter(|r| r.status == status).count() as u64,
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockReportPort;
    use super::*;
    use chrono::{Days, NaiveDate, Utc};
    use core_kernel::Actor;

    use crate::report::ReportDraft;

    fn student() -> Actor {
        Actor::user(Email::parse("budi@kampus.ac.id").unwrap())
    }

    fn admin() -> Actor {
        Actor::admin(Email::parse("admin@kampus.ac.id").unwrap())
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn report(item_name: &str, kind: ReportKind) -> Laporan {
        let draft = ReportDraft {
            item_name: item_name.to_string(),
            kind,
            location: "Perpustakaan lantai 2".to_string(),
            event_date: today() - Days::new(1),
            description: "Ditemukan di meja baca".to_string(),
            photo: None,
        };
        Laporan::submit(&student(), draft, today()).unwrap()
    }

    fn listed(item_name: &str, kind: ReportKind) -> Laporan {
        let mut report = report(item_name, kind);
        report.approve(&admin()).unwrap();
        report
    }

    #[tokio::test]
    async fn test_find_filters_and_counts() {
        let found = listed("Kunci motor", ReportKind::Found);
        let lost = listed("Dompet coklat", ReportKind::Lost);
        let pending = report("Botol minum", ReportKind::Lost);

        let port = MockReportPort::with_reports(vec![found.clone(), lost, pending]).await;

        let on_progress = port.find(ReportQuery::by_status(ReportStatus::OnProgress)).await.unwrap();
        assert_eq!(on_progress.len(), 2);

        let found_only = port
            .find(ReportQuery::by_status(ReportStatus::OnProgress).kind(Some(ReportKind::Found)))
            .await
            .unwrap();
        assert_eq!(found_only, vec![found]);

        let search = port
            .find(ReportQuery::default().search(Some("KUNCI".into())))
            .await
            .unwrap();
        assert_eq!(search.len(), 1);

        let counts = port.status_counts().await.unwrap();
        let pending_count = counts
            .iter()
            .find(|c| c.status == ReportStatus::PendingVerification)
            .unwrap();
        assert_eq!(pending_count.count, 1);
        assert_eq!(counts.len(), ReportStatus::ALL.len());
    }

    #[tokio::test]
    async fn test_find_respects_limit() {
        let port = MockReportPort::with_reports(vec![
            listed("Payung", ReportKind::Found),
            listed("Jaket", ReportKind::Found),
            listed("Topi", ReportKind::Found),
        ])
        .await;

        let latest = port.find(ReportQuery::default().limit(2)).await.unwrap();
        assert_eq!(latest.len(), 2);
    }

    #[tokio::test]
    async fn test_save_unknown_report_is_not_found() {
        let port = MockReportPort::new();
        let err = port.save(&report("Payung", ReportKind::Found)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_save_from_stale_copy_conflicts() {
        let pending = report("Payung", ReportKind::Found);
        let port = MockReportPort::with_reports(vec![pending.clone()]).await;

        let mut cancelled = pending.clone();
        cancelled.cancel(&student()).unwrap();
        port.save(&cancelled).await.unwrap();

        let mut approved = pending;
        approved.approve(&admin()).unwrap();
        assert!(port.save(&approved).await.unwrap_err().is_conflict());
        assert_eq!(port.get(approved.id).await.unwrap().status, ReportStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let report = report("Payung", ReportKind::Found);
        let port = MockReportPort::new();
        port.insert(&report).await.unwrap();
        assert!(port.insert(&report).await.unwrap_err().is_conflict());
    }
}
