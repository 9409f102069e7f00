//! Admin area: dashboard, user list, verification queue and decisions

use axum::{
    extract::{Multipart, Path, State},
    Extension, Form, Json,
};
use validator::Validate;

use core_kernel::Actor;
use domain_report::{ReportQuery, ReportStatus};

use crate::dto::{
    claim_views, report_views, ClaimView, DashboardView, MultipartForm, ReasonForm, ReportView,
    StatusCountView, UserView, VerificationView,
};
use crate::error::ApiError;
use crate::handlers::{claim_id, mahasiswa, report_id};
use crate::services::{claims, reports};
use crate::AppState;

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardView>, ApiError> {
    let counts = state.reports.status_counts().await?;
    let pending_claims = state.claims.list_pending().await?.len();
    let users = state.users.list(None).await?.len();

    Ok(Json(DashboardView {
        total_reports: counts.iter().map(|c| c.count).sum(),
        report_counts: counts.iter().map(StatusCountView::from).collect(),
        pending_claims,
        users,
    }))
}

pub async fn user_list(State(state): State<AppState>) -> Result<Json<Vec<UserView>>, ApiError> {
    let users = state.users.list(None).await?;
    Ok(Json(users.iter().map(UserView::from).collect()))
}

pub async fn my_reports(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<ReportView>>, ApiError> {
    Ok(Json(mahasiswa::own_history(&state, &actor).await?.reports))
}

pub async fn my_claims(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<ClaimView>>, ApiError> {
    let claims = state.claims.list_by_claimant(&actor.email).await?;
    Ok(Json(claim_views(&claims)))
}

/// Reports waiting for verification and claims waiting for a decision
pub async fn verification_queue(
    State(state): State<AppState>,
) -> Result<Json<VerificationView>, ApiError> {
    let mut pending = state
        .reports
        .find(ReportQuery::by_status(ReportStatus::PendingVerification))
        .await?;
    // oldest first, like the claim queue
    pending.reverse();
    let claims = state.claims.list_pending().await?;

    Ok(Json(VerificationView {
        reports: report_views(&pending),
        claims: claim_views(&claims),
    }))
}

pub async fn approve_report(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ReportView>, ApiError> {
    let report = reports::approve(&state, &actor, report_id(&id)?).await?;
    Ok(Json(ReportView::from(&report)))
}

/// Form `alasan` is required
pub async fn reject_report(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Form(form): Form<ReasonForm>,
) -> Result<Json<ReportView>, ApiError> {
    let id = report_id(&id)?;
    form.validate()?;
    let report = reports::reject(&state, &actor, id, &form.alasan).await?;
    Ok(Json(ReportView::from(&report)))
}

pub async fn complete_report(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ReportView>, ApiError> {
    let report = reports::complete(&state, &actor, report_id(&id)?).await?;
    Ok(Json(ReportView::from(&report)))
}

/// Multipart form with the `bukti` evidence file
pub async fn approve_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ClaimView>, ApiError> {
    let id = claim_id(&id)?;
    let form = MultipartForm::read(multipart).await?;
    let claim = claims::approve(&state, &actor, id, form).await?;
    Ok(Json(ClaimView::from(&claim)))
}

/// Form `alasan` is required
pub async fn reject_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Form(form): Form<ReasonForm>,
) -> Result<Json<ClaimView>, ApiError> {
    let id = claim_id(&id)?;
    form.validate()?;
    let claim = claims::reject(&state, &actor, id, &form.alasan).await?;
    Ok(Json(ClaimView::from(&claim)))
}
