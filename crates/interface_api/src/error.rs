//! API error handling
//!
//! Domain and infrastructure errors are mapped onto HTTP statuses here, so
//! handlers can use `?` throughout. User-facing messages are in Indonesian.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::PortError;
use domain_claims::ClaimError;
use domain_report::ReportError;
use domain_user::UserError;
use infra_storage::StorageError;

use crate::auth::AuthError;

/// Generic message for failed logins
pub const BAD_CREDENTIALS: &str = "Email atau Password salah";

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Conflict tied to one form field, e.g. an email that is already taken
    #[error("Conflict on {field}: {message}")]
    FieldConflict { field: String, message: String },

    /// Form validation failure with one message per field
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },

    /// Request body over the configured upload limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Validation error on a single form field
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), message.clone());
        ApiError::Validation { message, fields }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) | ApiError::FieldConflict { .. } => StatusCode::CONFLICT,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_type, message, fields) = match self {
            ApiError::NotFound(msg) => ("not_found", msg, None),
            ApiError::BadRequest(msg) => ("bad_request", msg, None),
            ApiError::Unauthorized(msg) => ("unauthorized", msg, None),
            ApiError::Forbidden(msg) => ("forbidden", msg, None),
            ApiError::Conflict(msg) => ("conflict", msg, None),
            ApiError::FieldConflict { field, message } => {
                let fields = BTreeMap::from([(field, message.clone())]);
                ("conflict", message, Some(fields))
            }
            ApiError::Validation { message, fields } => ("validation_error", message, Some(fields)),
            ApiError::PayloadTooLarge(msg) => ("payload_too_large", msg, None),
            ApiError::Unavailable(msg) => ("unavailable", msg, None),
            ApiError::Internal(msg) => {
                error!(error = %msg, "Internal server error");
                ("internal_error", "Terjadi kesalahan pada server".to_string(), None)
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            fields,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity, .. } => {
                ApiError::NotFound(format!("{entity} tidak ditemukan"))
            }
            PortError::Invalid { message } => ApiError::BadRequest(message),
            PortError::Conflict { message } => ApiError::Conflict(message),
            PortError::Unavailable { message } => ApiError::Unavailable(message),
            PortError::Internal { message, .. } => ApiError::Internal(message),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DuplicateEmail(_) => ApiError::FieldConflict {
                field: "email".to_string(),
                message: "Email sudah terdaftar".to_string(),
            },
            UserError::InvalidCredentials => ApiError::Unauthorized(BAD_CREDENTIALS.to_string()),
            UserError::NotVerified => ApiError::Forbidden(
                "Silakan verifikasi email Anda terlebih dahulu".to_string(),
            ),
            UserError::InvalidToken => ApiError::BadRequest("Token tidak valid".to_string()),
            UserError::TokenExpired => ApiError::BadRequest("Token sudah kedaluwarsa".to_string()),
            UserError::PasswordHash(msg) => ApiError::Internal(msg),
            UserError::InvalidData(msg) => ApiError::Validation {
                message: msg,
                fields: BTreeMap::new(),
            },
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidStatusTransition { .. } => ApiError::Conflict(
                "Status laporan tidak memungkinkan aksi ini".to_string(),
            ),
            ReportError::NotAuthorized(msg) => ApiError::Forbidden(msg),
            ReportError::ReasonRequired => ApiError::field("alasan", "Alasan penolakan wajib diisi"),
            ReportError::InvalidDraft(msg) => ApiError::Validation {
                message: msg,
                fields: BTreeMap::new(),
            },
        }
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::UnknownStatus(status) => {
                ApiError::BadRequest(format!("Status klaim tidak dikenal: {status}"))
            }
            ClaimError::ReportNotClaimable(_) => {
                ApiError::Conflict("Laporan tidak dapat diklaim saat ini".to_string())
            }
            ClaimError::ReportMismatch => {
                ApiError::Conflict("Klaim bukan milik laporan ini".to_string())
            }
            ClaimError::OwnReport => {
                ApiError::Conflict("Tidak dapat mengklaim laporan milik sendiri".to_string())
            }
            ClaimError::DuplicatePendingClaim => {
                ApiError::Conflict("Klaim untuk laporan ini sudah diajukan".to_string())
            }
            ClaimError::InvalidStatusTransition { .. } => ApiError::Conflict(
                "Status klaim tidak memungkinkan aksi ini".to_string(),
            ),
            ClaimError::NotAuthorized(msg) => ApiError::Forbidden(msg),
            ClaimError::ReasonRequired => ApiError::field("alasan", "Alasan penolakan wajib diisi"),
            ClaimError::EvidenceRequired => {
                ApiError::field("bukti", "Bukti serah terima wajib diunggah")
            }
            ClaimError::DescriptionRequired => {
                ApiError::field("deskripsi", "Deskripsi klaim wajib diisi")
            }
            ClaimError::Report(err) => err.into(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        if err.is_client_error() {
            ApiError::Validation {
                message: err.to_string(),
                fields: BTreeMap::new(),
            }
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired => ApiError::Unauthorized("Sesi telah berakhir".to_string()),
            AuthError::InvalidToken => ApiError::Unauthorized("Sesi tidak valid".to_string()),
            AuthError::Encoding(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: BTreeMap<String, String> = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                errs.first().map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} tidak valid"));
                    (field.to_string(), message)
                })
            })
            .collect();
        let message = fields
            .values()
            .next()
            .cloned()
            .unwrap_or_else(|| "Data tidak valid".to_string());
        ApiError::Validation { message, fields }
    }
}
