//! Claim use cases

use tracing::info;

use core_kernel::{Actor, ClaimId, ReportId};
use domain_claims::{approve_claim, Claim, Evidence, SUPERSEDED_REASON};
use infra_storage::UploadCategory;

use crate::dto::MultipartForm;
use crate::error::ApiError;
use crate::services::accounts::discard_upload;
use crate::AppState;

/// Files a claim and tells the report owner about it
pub async fn file(
    state: &AppState,
    actor: &Actor,
    report_id: ReportId,
    description: &str,
) -> Result<Claim, ApiError> {
    let report = state.reports.get(report_id).await?;
    let existing = state.claims.list_for_report(report_id).await?;

    let claim = Claim::file(&report, &existing, actor, description)?;
    state.claims.insert(&claim).await?;

    state.notifier.new_claim(&report.owner, &report.item_name, &claim.claimant);
    info!(claim_id = %claim.id, report_id = %report.id, claimant = %claim.claimant, "Claim filed");
    Ok(claim)
}

/// The claimant withdraws a pending claim
pub async fn cancel(state: &AppState, actor: &Actor, id: ClaimId) -> Result<Claim, ApiError> {
    let mut claim = state.claims.get(id).await?;
    claim.cancel(actor)?;
    state.claims.save(&claim).await?;
    info!(claim_id = %claim.id, "Claim cancelled");
    Ok(claim)
}

/// Approves a claim with the uploaded hand-over evidence (`bukti`)
///
/// The report becomes claimed and the competing pending claims are
/// rejected, all in one write. The evidence file is removed again if the
/// approval does not go through.
pub async fn approve(
    state: &AppState,
    actor: &Actor,
    id: ClaimId,
    mut form: MultipartForm,
) -> Result<Claim, ApiError> {
    let claim = state.claims.get(id).await?;
    let report = state.reports.get(claim.report_id).await?;
    let others = state.claims.list_for_report(claim.report_id).await?;

    let stored = match form.take_file("bukti") {
        Some(file) => Some(
            state
                .files
                .save(UploadCategory::ClaimEvidence, &file.file_name, &file.bytes)
                .await?,
        ),
        None => None,
    };

    let outcome = async {
        let evidence = stored.as_deref().map(Evidence::new).transpose()?;
        let resolution = approve_claim(report, claim, others, actor, evidence)?;
        state.claims.save_resolution(&resolution).await?;
        Ok::<_, ApiError>(resolution)
    }
    .await;

    let resolution = match outcome {
        Ok(resolution) => resolution,
        Err(e) => {
            if let Some(path) = stored {
                discard_upload(state, &path).await;
            }
            return Err(e);
        }
    };

    let item = &resolution.report.item_name;
    for superseded in &resolution.affected {
        state
            .notifier
            .claim_rejected(&superseded.claimant, item, SUPERSEDED_REASON);
    }
    let approved = resolution
        .decided
        .ok_or_else(|| ApiError::Internal("approval produced no decided claim".to_string()))?;
    state.notifier.claim_approved(&approved.claimant, item);
    Ok(approved)
}

pub async fn reject(state: &AppState, actor: &Actor, id: ClaimId, reason: &str) -> Result<Claim, ApiError> {
    let mut claim = state.claims.get(id).await?;
    claim.reject(actor, reason)?;
    state.claims.save(&claim).await?;

    let report = state.reports.get(claim.report_id).await?;
    let reason = claim.rejection_reason.as_deref().unwrap_or(reason);
    state.notifier.claim_rejected(&claim.claimant, &report.item_name, reason);
    info!(claim_id = %claim.id, admin = %actor.email, "Claim rejected");
    Ok(claim)
}
