//! Report use cases

use chrono::{NaiveDate, Utc};
use tracing::info;

use core_kernel::{Actor, ReportId};
use domain_claims::{cancel_report, REPORT_CANCELLED_REASON};
use domain_report::{Laporan, ReportDraft, ReportKind};
use infra_notify::ReportEvent;
use infra_storage::UploadCategory;

use crate::dto::MultipartForm;
use crate::error::ApiError;
use crate::services::accounts::discard_upload;
use crate::AppState;

/// Reads the report form fields into a draft (without the photo)
pub fn draft_from_form(form: &MultipartForm) -> Result<ReportDraft, ApiError> {
    let item_name = form.required("nama_barang", "Nama barang wajib diisi")?;
    let kind: ReportKind = form
        .required("jenis_laporan", "Jenis laporan wajib dipilih")?
        .parse()
        .map_err(|_| ApiError::field("jenis_laporan", "Jenis laporan tidak dikenal"))?;
    let location = form.required("lokasi", "Lokasi wajib diisi")?;
    let event_date = NaiveDate::parse_from_str(
        form.required("tanggal_kejadian", "Tanggal kejadian wajib diisi")?,
        "%Y-%m-%d",
    )
    .map_err(|_| ApiError::field("tanggal_kejadian", "Format tanggal tidak valid"))?;
    let description = form.required("deskripsi", "Deskripsi wajib diisi")?;

    Ok(ReportDraft {
        item_name: item_name.to_string(),
        kind,
        location: location.to_string(),
        event_date,
        description: description.to_string(),
        photo: None,
    })
}

/// Files a new report; admins' reports are listed immediately
pub async fn submit(state: &AppState, actor: &Actor, mut form: MultipartForm) -> Result<Laporan, ApiError> {
    let mut draft = draft_from_form(&form)?;

    if let Some(file) = form.take_file("foto") {
        let path = state
            .files
            .save(UploadCategory::ReportPhoto, &file.file_name, &file.bytes)
            .await?;
        draft.photo = Some(path);
    }
    let photo = draft.photo.clone();

    let stored = match Laporan::submit(actor, draft, Utc::now().date_naive()) {
        Ok(report) => state.reports.insert(&report).await.map(|_| report).map_err(ApiError::from),
        Err(e) => Err(e.into()),
    };
    let report = match stored {
        Ok(report) => report,
        Err(e) => {
            if let Some(path) = photo {
                discard_upload(state, &path).await;
            }
            return Err(e);
        }
    };

    state.events.publish(ReportEvent::created(&report));
    info!(report_id = %report.id, owner = %report.owner, status = %report.status, "Report submitted");
    Ok(report)
}

/// Admin verification
pub async fn approve(state: &AppState, actor: &Actor, id: ReportId) -> Result<Laporan, ApiError> {
    let mut report = state.reports.get(id).await?;
    report.approve(actor)?;
    state.reports.save(&report).await?;

    state.events.publish(ReportEvent::listed(&report));
    state.notifier.report_verified(&report.owner, &report.item_name);
    info!(report_id = %report.id, admin = %actor.email, "Report verified");
    Ok(report)
}

pub async fn reject(state: &AppState, actor: &Actor, id: ReportId, reason: &str) -> Result<Laporan, ApiError> {
    let mut report = state.reports.get(id).await?;
    report.reject(actor, reason)?;
    state.reports.save(&report).await?;

    let reason = report.rejection_reason.as_deref().unwrap_or(reason);
    state.notifier.report_rejected(&report.owner, &report.item_name, reason);
    info!(report_id = %report.id, admin = %actor.email, "Report rejected");
    Ok(report)
}

/// Marks a claimed report as handed over
pub async fn complete(state: &AppState, actor: &Actor, id: ReportId) -> Result<Laporan, ApiError> {
    let mut report = state.reports.get(id).await?;
    report.complete(actor)?;
    state.reports.save(&report).await?;
    info!(report_id = %report.id, admin = %actor.email, "Report completed");
    Ok(report)
}

/// The owner withdraws a report; its pending claims are closed with it
pub async fn cancel(state: &AppState, actor: &Actor, id: ReportId) -> Result<Laporan, ApiError> {
    let report = state.reports.get(id).await?;
    let claims = state.claims.list_for_report(id).await?;

    let resolution = cancel_report(report, claims, actor)?;
    state.claims.save_resolution(&resolution).await?;

    for claim in &resolution.affected {
        state
            .notifier
            .claim_rejected(&claim.claimant, &resolution.report.item_name, REPORT_CANCELLED_REASON);
    }
    Ok(resolution.report)
}
