//! HTTP API Layer
//!
//! The SILAPOR web API using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: one module per site area (public, student, admin)
//! - **Services**: use cases over the domain ports
//! - **Middleware**: session authentication, role guards, audit logging
//! - **DTOs**: form payloads and page view models
//! - **Error Handling**: consistent JSON error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;
pub mod services;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use domain_claims::ClaimPort;
use domain_report::ReportPort;
use domain_user::UserPort;
use infra_db::DatabasePool;
use infra_notify::{EventBus, Notifier};
use infra_storage::FileStore;

use crate::config::ApiConfig;
use crate::dto::UPLOADS_PREFIX;
use crate::handlers::{admin, auth as account, claims, events, health, mahasiswa, profile, reports};
use crate::middleware::{audit_middleware, auth_middleware, require_admin, require_user};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub users: Arc<dyn UserPort>,
    pub reports: Arc<dyn ReportPort>,
    pub claims: Arc<dyn ClaimPort>,
    pub files: FileStore,
    pub notifier: Notifier,
    pub events: EventBus,
    /// Present when running against PostgreSQL; used by the readiness check
    pub pool: Option<DatabasePool>,
}

/// Creates the main router
///
/// # Routes
///
/// - public: landing, login/register/logout, email verification, password
///   reset, health, uploaded files
/// - `/mahasiswa/*` and `/profile`: role `user`
/// - `/admin/*`: role `admin`
/// - `/events`: any signed-in user; students only see listed reports
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(account::landing))
        .route("/login", post(account::login))
        .route("/register", post(account::register))
        .route("/logout", get(account::logout).post(account::logout))
        .route("/verify-email", get(account::verify_email))
        .route("/forgot-password", post(account::forgot_password))
        .route("/reset-password", post(account::reset_password))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest_service(UPLOADS_PREFIX, ServeDir::new(state.files.root()));

    let user_routes = Router::new()
        .route("/profile", get(profile::show_profile).post(profile::update_profile))
        .route("/mahasiswa/home", get(mahasiswa::home))
        .route("/mahasiswa/history", get(mahasiswa::history))
        .route("/mahasiswa/reports", post(reports::create_report))
        .route("/mahasiswa/reports/:id/cancel", post(reports::cancel_report))
        .route("/mahasiswa/reports/:id/claims", post(claims::file_claim))
        .route("/mahasiswa/claims/:id/cancel", post(claims::cancel_claim))
        .route_layer(axum_middleware::from_fn(require_user));

    let admin_routes = Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/userList", get(admin::user_list))
        .route("/my-reports", get(admin::my_reports))
        .route("/my-claim", get(admin::my_claims))
        .route("/verifikasi", get(admin::verification_queue))
        .route("/verifikasi/:id/approve", post(admin::approve_report))
        .route("/verifikasi/:id/reject", post(admin::reject_report))
        .route("/claims/:id/approve", post(admin::approve_claim))
        .route("/claims/:id/reject", post(admin::reject_claim))
        .route("/claims/:id/cancel", post(claims::cancel_claim))
        .route("/reports", post(reports::create_report))
        .route("/reports/:id/done", post(admin::complete_report))
        .route("/reports/:id/cancel", post(reports::cancel_report))
        .route("/reports/:id/claims", post(claims::file_claim))
        .route("/profile", get(profile::show_profile).post(profile::update_profile))
        .route_layer(axum_middleware::from_fn(require_admin));

    // Session-protected routes
    let protected_routes = Router::new()
        .merge(user_routes)
        .nest("/admin", admin_routes)
        .route("/events", get(events::report_events))
        .route_layer(axum_middleware::from_fn(audit_middleware))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    let body_limit = state.config.body_limit();

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
