//! Form payloads
//!
//! Field names follow the HTML forms (`nama`, `no_telepon`, `alasan`, ...).
//! Every field defaults to empty so a missing input shows up as a field
//! validation message instead of an extractor rejection.

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use core_kernel::Email;
use domain_report::ReportKind;
use domain_user::validation;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(custom(function = "email_field"))]
    pub email: String,
    #[validate(custom(function = "password_field"))]
    pub password: String,
    #[validate(custom(function = "name_field"))]
    pub nama: String,
    #[validate(custom(function = "phone_field"))]
    pub no_telepon: String,
    #[validate(custom(function = "address_field"))]
    pub alamat: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ForgotPasswordForm {
    #[validate(custom(function = "email_field"))]
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ResetPasswordForm {
    #[validate(length(min = 1, message = "Token wajib diisi"))]
    pub token: String,
    #[validate(custom(function = "password_field"))]
    pub password: String,
}

/// Rejection of a report or claim
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReasonForm {
    #[validate(custom(function = "required_reason"))]
    pub alasan: String,
}

/// A new claim against a report
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ClaimForm {
    #[validate(length(min = 1, max = 2000, message = "Deskripsi klaim wajib diisi"))]
    pub deskripsi: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VerifyEmailQuery {
    pub token: String,
}

/// Filters on the report listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrowseQuery {
    /// `lost` / `found` (the Indonesian labels are accepted too)
    pub jenis: Option<String>,
    pub q: Option<String>,
}

impl BrowseQuery {
    /// Unknown or blank kinds mean "all kinds"
    pub fn kind(&self) -> Option<ReportKind> {
        self.jenis
            .as_deref()
            .filter(|j| !j.trim().is_empty())
            .and_then(|j| j.parse().ok())
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn email_field(value: &str) -> Result<(), ValidationError> {
    Email::parse(value)
        .map(|_| ())
        .map_err(|_| field_error("email", "Format email tidak valid"))
}

fn password_field(value: &str) -> Result<(), ValidationError> {
    validation::check_password(value).map_err(|m| field_error("password", m))
}

fn name_field(value: &str) -> Result<(), ValidationError> {
    validation::check_name(value).map_err(|m| field_error("nama", m))
}

fn phone_field(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    validation::check_phone(value).map_err(|m| field_error("no_telepon", m))
}

fn address_field(value: &str) -> Result<(), ValidationError> {
    validation::check_address(value).map_err(|m| field_error("alamat", m))
}

fn required_reason(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(field_error("alasan", "Alasan penolakan wajib diisi"))
    } else {
        Ok(())
    }
}
