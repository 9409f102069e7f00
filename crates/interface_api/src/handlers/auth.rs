//! Public pages and session handlers

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use tracing::debug;

use domain_report::{ReportQuery, ReportStatus};

use crate::auth::{clear_cookie, create_token, session_cookie};
use crate::dto::{
    public_report_views, BrowseQuery, ForgotPasswordForm, ListingView, LoginForm, MessageView,
    RegisterForm, ResetPasswordForm, VerifyEmailQuery,
};
use crate::error::ApiError;
use crate::services::accounts;
use crate::AppState;

/// Number of reports shown on the landing page
pub const LANDING_LIMIT: u32 = 12;

/// Landing page: the latest listed reports
pub async fn landing(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<ListingView>, ApiError> {
    let reports = state
        .reports
        .find(
            ReportQuery::by_status(ReportStatus::OnProgress)
                .kind(query.kind())
                .search(query.q.clone())
                .limit(LANDING_LIMIT),
        )
        .await?;

    Ok(Json(ListingView {
        reports: public_report_views(&reports),
        jenis: query.kind(),
        q: query.q,
    }))
}

/// Starts a session and redirects to the role's home page
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let user = accounts::login(&state, &form.email, &form.password).await?;
    let actor = core_kernel::Actor::new(user.email.clone(), user.role);

    let token = create_token(&actor, &state.config.jwt_secret, state.config.jwt_expiration_secs)?;
    let cookie = session_cookie(&token, state.config.jwt_expiration_secs, state.config.cookie_secure);
    let target = if actor.is_admin() {
        "/admin/dashboard"
    } else {
        "/mahasiswa/home"
    };

    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(target)).into_response())
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, ApiError> {
    accounts::register(&state, form).await?;
    Ok(Redirect::to("/login"))
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Session cleared");
    (
        [(header::SET_COOKIE, clear_cookie(state.config.cookie_secure))],
        Redirect::to("/"),
    )
}

pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<Json<MessageView>, ApiError> {
    accounts::verify_email(&state, &query.token).await?;
    Ok(Json(MessageView::new(
        "Email berhasil diverifikasi, silakan login",
    )))
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Result<Json<MessageView>, ApiError> {
    accounts::forgot_password(&state, form).await?;
    Ok(Json(MessageView::new(
        "Jika email terdaftar, tautan reset password telah dikirim",
    )))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Json<MessageView>, ApiError> {
    accounts::reset_password(&state, form).await?;
    Ok(Json(MessageView::new(
        "Password berhasil diubah, silakan login",
    )))
}
