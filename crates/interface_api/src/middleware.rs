//! API middleware

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::time::Instant;
use tracing::{info, warn};

use core_kernel::{Actor, Role};

use crate::auth::{token_from_headers, validate_token};
use crate::error::ApiError;
use crate::AppState;

/// Authentication middleware
///
/// Reads the session token and stores the caller's [`Actor`] in the request
/// extensions. Visitors without a session are sent back to the landing page;
/// a token that fails validation gets a 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = token_from_headers(request.headers()) else {
        return Redirect::to("/").into_response();
    };

    match validate_token(&token, &state.config.jwt_secret) {
        Ok(claims) => {
            request.extensions_mut().insert(claims.actor());
            next.run(request).await
        }
        Err(e) => {
            warn!(error = %e, uri = %request.uri(), "Token validation failed");
            ApiError::from(e).into_response()
        }
    }
}

/// Only admins pass
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    require_role(Role::Admin, request, next).await
}

/// Only students (role `user`) pass
pub async fn require_user(request: Request<Body>, next: Next) -> Response {
    require_role(Role::User, request, next).await
}

async fn require_role(role: Role, request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<Actor>() {
        Some(actor) if actor.role == role => next.run(request).await,
        Some(actor) => {
            warn!(user = %actor.email, required = %role, uri = %request.uri(), "Role check failed");
            ApiError::Forbidden("Anda tidak memiliki akses ke halaman ini".to_string()).into_response()
        }
        None => ApiError::Unauthorized("Sesi tidak valid".to_string()).into_response(),
    }
}

/// Logs every authenticated request with its caller and outcome
///
/// Server errors are logged at `warn`.
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let user = request
        .extensions()
        .get::<Actor>()
        .map(|a| a.email.to_string())
        .unwrap_or_else(|| "anonymous".to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        warn!(%method, %uri, %user, status, duration_ms, "Request failed");
    } else {
        info!(%method, %uri, %user, status, duration_ms, "Request handled");
    }

    response
}
