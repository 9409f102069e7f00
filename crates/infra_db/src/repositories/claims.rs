//! Claim repository
//!
//! Besides single-claim writes, this repository persists workflow
//! resolutions: the report and every claim the step touched are written in
//! one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use core_kernel::{ClaimId, DomainPort, Email, PortError, ReportId};
use domain_claims::{Claim, ClaimPort, ClaimStatus, Evidence, Resolution, STALE_CLAIM};

use super::reports::update_report;
use super::{email_column, optional_email_column};
use crate::error::{map_sqlx, DatabaseError};

const CLAIM_COLUMNS: &str = r#"
    id, report_id, claimant_email, description, status, rejection_reason,
    evidence, decided_by, created_at, updated_at
"#;

/// PostgreSQL-backed [`ClaimPort`]
#[derive(Debug, Clone)]
pub struct PgClaimRepository {
    pool: PgPool,
}

impl PgClaimRepository {
    /// Creates a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_where(
        &self,
        filter: &str,
        order: &str,
        bind: ClaimFilter<'_>,
    ) -> Result<Vec<Claim>, PortError> {
        let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE {filter} ORDER BY {order}");
        let query = sqlx::query_as::<_, ClaimRow>(&sql);
        let query = match bind {
            ClaimFilter::Report(id) => query.bind(id),
            ClaimFilter::Claimant(email) => query.bind(email),
            ClaimFilter::Status(status) => query.bind(status),
        };
        let rows = query.fetch_all(&self.pool).await.map_err(map_sqlx)?;
        rows.into_iter().map(Claim::try_from).collect()
    }
}

enum ClaimFilter<'a> {
    Report(Uuid),
    Claimant(&'a str),
    Status(DbClaimStatus),
}

/// Writes a claim decision, guarded like `update_report`
async fn update_claim(
    tx: &mut Transaction<'_, Postgres>,
    claim: &Claim,
) -> Result<(), PortError> {
    let result = sqlx::query(
        r#"
        UPDATE claims SET
            description = $2, status = $3, rejection_reason = $4, evidence = $5,
            decided_by = $6, updated_at = $7
        WHERE id = $1 AND status::text = ANY($8)
        "#,
    )
    .bind(claim.id.as_uuid())
    .bind(&claim.description)
    .bind(DbClaimStatus::from(claim.status))
    .bind(&claim.rejection_reason)
    .bind(claim.evidence.as_ref().map(Evidence::path))
    .bind(claim.decided_by.as_ref().map(Email::as_str))
    .bind(claim.updated_at)
    .bind(
        claim
            .status
            .predecessors()
            .iter()
            .map(ClaimStatus::as_str)
            .collect::<Vec<_>>(),
    )
    .execute(&mut **tx)
    .await
    .map_err(map_sqlx)?;

    if result.rows_affected() > 0 {
        return Ok(());
    }
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM claims WHERE id = $1)")
        .bind(claim.id.as_uuid())
        .fetch_one(&mut **tx)
        .await
        .map_err(map_sqlx)?;
    if exists {
        debug!(claim_id = %claim.id, to = %claim.status, "Stale claim update refused");
        Err(PortError::conflict(STALE_CLAIM))
    } else {
        Err(PortError::not_found("Claim", claim.id))
    }
}

impl DomainPort for PgClaimRepository {}

#[async_trait]
impl ClaimPort for PgClaimRepository {
    #[instrument(skip(self, claim), fields(claim_id = %claim.id, report_id = %claim.report_id))]
    async fn insert(&self, claim: &Claim) -> Result<(), PortError> {
        sqlx::query(
            r#"
            INSERT INTO claims (
                id, report_id, claimant_email, description, status, rejection_reason,
                evidence, decided_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(claim.id.as_uuid())
        .bind(claim.report_id.as_uuid())
        .bind(claim.claimant.as_str())
        .bind(&claim.description)
        .bind(DbClaimStatus::from(claim.status))
        .bind(&claim.rejection_reason)
        .bind(claim.evidence.as_ref().map(Evidence::path))
        .bind(claim.decided_by.as_ref().map(Email::as_str))
        .bind(claim.created_at)
        .bind(claim.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        debug!("Claim inserted");
        Ok(())
    }

    async fn get(&self, id: ClaimId) -> Result<Claim, PortError> {
        let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE id = $1");
        let row = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| PortError::not_found("Claim", id))?;
        row.try_into()
    }

    #[instrument(skip(self, claim), fields(claim_id = %claim.id, status = %claim.status))]
    async fn save(&self, claim: &Claim) -> Result<(), PortError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        update_claim(&mut tx, claim).await?;
        tx.commit().await.map_err(map_sqlx)?;
        Ok(())
    }

    async fn list_for_report(&self, report_id: ReportId) -> Result<Vec<Claim>, PortError> {
        self.fetch_where(
            "report_id = $1",
            "created_at, id",
            ClaimFilter::Report(*report_id.as_uuid()),
        )
        .await
    }

    async fn list_by_claimant(&self, claimant: &Email) -> Result<Vec<Claim>, PortError> {
        self.fetch_where(
            "claimant_email = $1",
            "created_at DESC, id DESC",
            ClaimFilter::Claimant(claimant.as_str()),
        )
        .await
    }

    async fn list_by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, PortError> {
        self.fetch_where(
            "status = $1",
            "created_at, id",
            ClaimFilter::Status(status.into()),
        )
        .await
    }

    #[instrument(skip(self, resolution), fields(report_id = %resolution.report.id))]
    async fn save_resolution(&self, resolution: &Resolution) -> Result<(), PortError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        update_report(&mut tx, &resolution.report).await?;
        let mut written = 0usize;
        for claim in resolution.claims() {
            update_claim(&mut tx, claim).await?;
            written += 1;
        }

        tx.commit().await.map_err(map_sqlx)?;
        info!(claims = written, status = %resolution.report.status, "Resolution persisted");
        Ok(())
    }
}

/// Mirror of the `claim_status` Postgres enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_status", rename_all = "snake_case")]
pub enum DbClaimStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl From<ClaimStatus> for DbClaimStatus {
    fn from(status: ClaimStatus) -> Self {
        match status {
            ClaimStatus::Pending => DbClaimStatus::Pending,
            ClaimStatus::Approved => DbClaimStatus::Approved,
            ClaimStatus::Rejected => DbClaimStatus::Rejected,
            ClaimStatus::Cancelled => DbClaimStatus::Cancelled,
        }
    }
}

impl From<DbClaimStatus> for ClaimStatus {
    fn from(status: DbClaimStatus) -> Self {
        match status {
            DbClaimStatus::Pending => ClaimStatus::Pending,
            DbClaimStatus::Approved => ClaimStatus::Approved,
            DbClaimStatus::Rejected => ClaimStatus::Rejected,
            DbClaimStatus::Cancelled => ClaimStatus::Cancelled,
        }
    }
}

/// Database row for a claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimRow {
    pub id: Uuid,
    pub report_id: Uuid,
    pub claimant_email: String,
    pub description: String,
    pub status: DbClaimStatus,
    pub rejection_reason: Option<String>,
    pub evidence: Option<String>,
    pub decided_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ClaimRow> for Claim {
    type Error = PortError;

    fn try_from(row: ClaimRow) -> Result<Self, Self::Error> {
        let evidence = row
            .evidence
            .map(Evidence::new)
            .transpose()
            .map_err(|e| DatabaseError::corrupt("evidence", e))?;
        Ok(Claim {
            id: ClaimId::from_uuid(row.id),
            report_id: ReportId::from_uuid(row.report_id),
            claimant: email_column(row.claimant_email)?,
            description: row.description,
            status: row.status.into(),
            rejection_reason: row.rejection_reason,
            evidence,
            decided_by: optional_email_column(row.decided_by)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_covers_every_status() {
        for status in ClaimStatus::ALL {
            assert_eq!(ClaimStatus::from(DbClaimStatus::from(status)), status);
        }
    }

    #[test]
    fn test_row_conversion() {
        let now = Utc::now();
        let row = ClaimRow {
            id: Uuid::now_v7(),
            report_id: Uuid::now_v7(),
            claimant_email: "siti@kampus.ac.id".to_string(),
            description: "Payung saya".to_string(),
            status: DbClaimStatus::Approved,
            rejection_reason: None,
            evidence: Some("bukti/abc.jpg".to_string()),
            decided_by: Some("admin@kampus.ac.id".to_string()),
            created_at: now,
            updated_at: now,
        };

        let claim = Claim::try_from(row).unwrap();
        assert_eq!(claim.status, ClaimStatus::Approved);
        assert_eq!(claim.evidence.as_ref().map(Evidence::path), Some("bukti/abc.jpg"));
        assert_eq!(claim.decided_by.as_ref().map(Email::as_str), Some("admin@kampus.ac.id"));
    }

    #[test]
    fn test_blank_evidence_column_is_corrupt() {
        let now = Utc::now();
        let row = ClaimRow {
            id: Uuid::now_v7(),
            report_id: Uuid::now_v7(),
            claimant_email: "siti@kampus.ac.id".to_string(),
            description: "Payung saya".to_string(),
            status: DbClaimStatus::Approved,
            rejection_reason: None,
            evidence: Some(" ".to_string()),
            decided_by: None,
            created_at: now,
            updated_at: now,
        };
        assert!(Claim::try_from(row).is_err());
    }
}
