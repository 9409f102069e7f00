//! Profile handlers, shared by the student and admin areas

use axum::{
    extract::{Multipart, State},
    Extension, Json,
};

use core_kernel::Actor;

use crate::dto::{MultipartForm, UserView};
use crate::error::ApiError;
use crate::services::accounts;
use crate::AppState;

pub async fn show_profile(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<UserView>, ApiError> {
    let user = accounts::profile(&state, &actor.email).await?;
    Ok(Json(UserView::from(&user)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    multipart: Multipart,
) -> Result<Json<UserView>, ApiError> {
    let form = MultipartForm::read(multipart).await?;
    let user = accounts::update_profile(&state, &actor.email, form).await?;
    Ok(Json(UserView::from(&user)))
}
