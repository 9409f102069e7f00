//! Report actions available to report owners

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};

use core_kernel::Actor;

use crate::dto::{MultipartForm, ReportView};
use crate::error::ApiError;
use crate::handlers::report_id;
use crate::services::reports;
use crate::AppState;

/// Multipart report form: `nama_barang`, `jenis_laporan`, `lokasi`,
/// `tanggal_kejadian`, `deskripsi`, optional `foto`
pub async fn create_report(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ReportView>), ApiError> {
    let form = MultipartForm::read(multipart).await?;
    let report = reports::submit(&state, &actor, form).await?;
    Ok((StatusCode::CREATED, Json(ReportView::from(&report))))
}

pub async fn cancel_report(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ReportView>, ApiError> {
    let report = reports::cancel(&state, &actor, report_id(&id)?).await?;
    Ok(Json(ReportView::from(&report)))
}
