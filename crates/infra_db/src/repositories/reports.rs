//! Report (laporan) repository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{DomainPort, PortError, ReportId};
use domain_report::{
    Laporan, ReportKind, ReportPort, ReportQuery, ReportStatus, StatusCount, STALE_REPORT,
};

use super::{email_column, optional_email_column};
use crate::error::map_sqlx;

pub(crate) const REPORT_COLUMNS: &str = r#"
    id, owner_email, item_name, kind, location, event_date, description, photo,
    status, rejection_reason, verified_by, created_at, updated_at
"#;

/// PostgreSQL-backed [`ReportPort`]
#[derive(Debug, Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    /// Creates a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Writes every mutable report column; shared with the claim repository so
/// resolutions update the report inside their transaction
///
/// The row is only touched while its stored status can still move to
/// `report.status`; otherwise the update is a conflict.
pub(crate) async fn update_report(
    tx: &mut Transaction<'_, Postgres>,
    report: &Laporan,
) -> Result<(), PortError> {
    let result = sqlx::query(
        r#"
        UPDATE laporan SET
            item_name = $2, kind = $3, location = $4, event_date = $5, description = $6,
            photo = $7, status = $8, rejection_reason = $9, verified_by = $10, updated_at = $11
        WHERE id = $1 AND status::text = ANY($12)
        "#,
    )
    .bind(report.id.as_uuid())
    .bind(&report.item_name)
    .bind(DbReportKind::from(report.kind))
    .bind(&report.location)
    .bind(report.event_date)
    .bind(&report.description)
    .bind(&report.photo)
    .bind(DbReportStatus::from(report.status))
    .bind(&report.rejection_reason)
    .bind(report.verified_by.as_ref().map(|e| e.as_str()))
    .bind(report.updated_at)
    .bind(status_names(report.status.predecessors()))
    .execute(&mut **tx)
    .await
    .map_err(map_sqlx)?;

    if result.rows_affected() > 0 {
        return Ok(());
    }
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM laporan WHERE id = $1)")
        .bind(report.id.as_uuid())
        .fetch_one(&mut **tx)
        .await
        .map_err(map_sqlx)?;
    if exists {
        debug!(report_id = %report.id, to = %report.status, "Stale report update refused");
        Err(PortError::conflict(STALE_REPORT))
    } else {
        Err(PortError::not_found("Laporan", report.id))
    }
}

fn status_names(statuses: Vec<ReportStatus>) -> Vec<&'static str> {
    statuses.iter().map(ReportStatus::as_str).collect()
}

/// Escapes LIKE wildcards and wraps the needle for a substring match
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

impl DomainPort for PgReportRepository {}

#[async_trait]
impl ReportPort for PgReportRepository {
    #[instrument(skip(self, report), fields(report_id = %report.id))]
    async fn insert(&self, report: &Laporan) -> Result<(), PortError> {
        sqlx::query(
            r#"
            INSERT INTO laporan (
                id, owner_email, item_name, kind, location, event_date, description, photo,
                status, rejection_reason, verified_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(report.id.as_uuid())
        .bind(report.owner.as_str())
        .bind(&report.item_name)
        .bind(DbReportKind::from(report.kind))
        .bind(&report.location)
        .bind(report.event_date)
        .bind(&report.description)
        .bind(&report.photo)
        .bind(DbReportStatus::from(report.status))
        .bind(&report.rejection_reason)
        .bind(report.verified_by.as_ref().map(|e| e.as_str()))
        .bind(report.created_at)
        .bind(report.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        debug!("Report inserted");
        Ok(())
    }

    async fn get(&self, id: ReportId) -> Result<Laporan, PortError> {
        let sql = format!("SELECT {REPORT_COLUMNS} FROM laporan WHERE id = $1");
        let row = sqlx::query_as::<_, ReportRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| PortError::not_found("Laporan", id))?;
        row.try_into()
    }

    #[instrument(skip(self, report), fields(report_id = %report.id, status = %report.status))]
    async fn save(&self, report: &Laporan) -> Result<(), PortError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        update_report(&mut tx, report).await?;
        tx.commit().await.map_err(map_sqlx)?;
        Ok(())
    }

    async fn find(&self, query: ReportQuery) -> Result<Vec<Laporan>, PortError> {
        let sql = format!(
            r#"
            SELECT {REPORT_COLUMNS} FROM laporan
            WHERE ($1::report_status IS NULL OR status = $1)
              AND ($2::report_kind IS NULL OR kind = $2)
              AND ($3::text IS NULL OR owner_email = $3)
              AND ($4::text IS NULL
                   OR item_name ILIKE $4
                   OR location ILIKE $4
                   OR description ILIKE $4)
            ORDER BY created_at DESC, id DESC
            LIMIT $5
            "#
        );
        let rows = sqlx::query_as::<_, ReportRow>(&sql)
            .bind(query.status.map(DbReportStatus::from))
            .bind(query.kind.map(DbReportKind::from))
            .bind(query.owner.as_ref().map(|e| e.as_str()))
            .bind(query.search.as_deref().map(like_pattern))
            .bind(query.limit.map(i64::from))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        rows.into_iter().map(Laporan::try_from).collect()
    }

    async fn status_counts(&self) -> Result<Vec<StatusCount>, PortError> {
        let rows: Vec<(DbReportStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM laporan GROUP BY status")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx)?;

        Ok(ReportStatus::ALL
            .into_iter()
            .map(|status| {
                let count = rows
                    .iter()
                    .find(|(s, _)| ReportStatus::from(*s) == status)
                    .map_or(0, |(_, n)| u64::try_from(*n).unwrap_or(0));
                StatusCount { status, count }
            })
            .collect())
    }
}

/// Mirror of the `report_kind` Postgres enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "report_kind", rename_all = "snake_case")]
pub enum DbReportKind {
    Lost,
    Found,
}

impl From<ReportKind> for DbReportKind {
    fn from(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Lost => DbReportKind::Lost,
            ReportKind::Found => DbReportKind::Found,
        }
    }
}

impl From<DbReportKind> for ReportKind {
    fn from(kind: DbReportKind) -> Self {
        match kind {
            DbReportKind::Lost => ReportKind::Lost,
            DbReportKind::Found => ReportKind::Found,
        }
    }
}

/// Mirror of the `report_status` Postgres enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
pub enum DbReportStatus {
    PendingVerification,
    OnProgress,
    Claimed,
    Done,
    Rejected,
    Cancelled,
}

impl From<ReportStatus> for DbReportStatus {
    fn from(status: ReportStatus) -> Self {
        match status {
            ReportStatus::PendingVerification => DbReportStatus::PendingVerification,
            ReportStatus::OnProgress => DbReportStatus::OnProgress,
            ReportStatus::Claimed => DbReportStatus::Claimed,
            ReportStatus::Done => DbReportStatus::Done,
            ReportStatus::Rejected => DbReportStatus::Rejected,
            ReportStatus::Cancelled => DbReportStatus::Cancelled,
        }
    }
}

impl From<DbReportStatus> for ReportStatus {
    fn from(status: DbReportStatus) -> Self {
        match status {
            DbReportStatus::PendingVerification => ReportStatus::PendingVerification,
            DbReportStatus::OnProgress => ReportStatus::OnProgress,
            DbReportStatus::Claimed => ReportStatus::Claimed,
            DbReportStatus::Done => ReportStatus::Done,
            DbReportStatus::Rejected => ReportStatus::Rejected,
            DbReportStatus::Cancelled => ReportStatus::Cancelled,
        }
    }
}

/// Database row for a report
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportRow {
    pub id: Uuid,
    pub owner_email: String,
    pub item_name: String,
    pub kind: DbReportKind,
    pub location: String,
    pub event_date: NaiveDate,
    pub description: String,
    pub photo: Option<String>,
    pub status: DbReportStatus,
    pub rejection_reason: Option<String>,
    pub verified_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for Laporan {
    type Error = PortError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(Laporan {
            id: ReportId::from_uuid(row.id),
            owner: email_column(row.owner_email)?,
            item_name: row.item_name,
            kind: row.kind.into(),
            location: row.location,
            event_date: row.event_date,
            description: row.description,
            photo: row.photo,
            status: row.status.into(),
            rejection_reason: row.rejection_reason,
            verified_by: optional_email_column(row.verified_by)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
