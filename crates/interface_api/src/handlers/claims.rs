//! Claim actions available to claimants

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Form, Json,
};
use validator::Validate;

use core_kernel::Actor;

use crate::dto::{ClaimForm, ClaimView};
use crate::error::ApiError;
use crate::handlers::{claim_id, report_id};
use crate::services::claims;
use crate::AppState;

pub async fn file_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Form(form): Form<ClaimForm>,
) -> Result<(StatusCode, Json<ClaimView>), ApiError> {
    let report_id = report_id(&id)?;
    form.validate()?;
    let claim = claims::file(&state, &actor, report_id, &form.deskripsi).await?;
    Ok((StatusCode::CREATED, Json(ClaimView::from(&claim))))
}

pub async fn cancel_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ClaimView>, ApiError> {
    let claim = claims::cancel(&state, &actor, claim_id(&id)?).await?;
    Ok(Json(ClaimView::from(&claim)))
}
