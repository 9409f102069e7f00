//! Account use cases

use chrono::Utc;
use tracing::{info, warn};
use validator::Validate;

use core_kernel::{Email, PortError};
use domain_user::{
    hash_password, validation, verify_missing_account, verify_password, NewUser, ProfileUpdate, User, UserError, UserPort,
    RESET_TOKEN_TTL_MINUTES,
};
use infra_storage::UploadCategory;

use crate::dto::{ForgotPasswordForm, MultipartForm, RegisterForm, ResetPasswordForm};
use crate::error::ApiError;
use crate::AppState;

/// Creates an unverified account and mails the verification link
pub async fn register(state: &AppState, form: RegisterForm) -> Result<User, ApiError> {
    form.validate()?;
    let email = Email::parse(&form.email).map_err(|_| ApiError::field("email", "Format email tidak valid"))?;

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(UserError::DuplicateEmail(email.to_string()).into());
    }

    let user = User::register(NewUser {
        email: email.clone(),
        name: form.nama,
        password_hash: hash_password(&form.password)?,
        phone: Some(form.no_telepon),
        address: Some(form.alamat),
    })?;

    state.users.insert(&user).await.map_err(|e| match e {
        PortError::Conflict { .. } => ApiError::from(UserError::DuplicateEmail(email.to_string())),
        other => other.into(),
    })?;

    if let Some(token) = user.verification_token.as_deref() {
        state.notifier.verification(&user.email, &user.name, token);
    }
    info!(email = %user.email, "Account registered");
    Ok(user)
}

/// Checks credentials
///
/// Unknown emails and wrong passwords fail the same way and take the same
/// argon2 work. The verification check comes after the password check so it
/// reveals nothing to a caller who does not know the password.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<User, ApiError> {
    let account = match Email::parse(email) {
        Ok(email) => state.users.find_by_email(&email).await?,
        Err(_) => None,
    };
    let Some(user) = account else {
        verify_missing_account(password);
        warn!("Failed login for unknown account");
        return Err(UserError::InvalidCredentials.into());
    };

    if !verify_password(password, &user.password_hash) {
        warn!(email = %user.email, "Failed login");
        return Err(UserError::InvalidCredentials.into());
    }
    if !user.is_verified {
        return Err(UserError::NotVerified.into());
    }

    info!(email = %user.email, role = %user.role, "Login");
    Ok(user)
}

pub async fn verify_email(state: &AppState, token: &str) -> Result<User, ApiError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(UserError::InvalidToken.into());
    }
    let mut user = state
        .users
        .find_by_verification_token(token)
        .await?
        .ok_or(UserError::InvalidToken)?;

    user.verify_email(token)?;
    state.users.save(&user).await?;
    info!(email = %user.email, "Email verified");
    Ok(user)
}

/// Issues a reset token when the account exists
///
/// Returns `Ok` either way so the response does not reveal which emails
/// are registered.
pub async fn forgot_password(state: &AppState, form: ForgotPasswordForm) -> Result<(), ApiError> {
    form.validate()?;
    let Ok(email) = Email::parse(&form.email) else {
        return Ok(());
    };
    let Some(mut user) = state.users.find_by_email(&email).await? else {
        info!(email = %email, "Password reset requested for unknown email");
        return Ok(());
    };

    let token = user.issue_reset_token(Utc::now());
    state.users.save(&user).await?;
    state
        .notifier
        .password_reset(&user.email, &user.name, &token, RESET_TOKEN_TTL_MINUTES);
    info!(email = %user.email, "Password reset token issued");
    Ok(())
}

pub async fn reset_password(state: &AppState, form: ResetPasswordForm) -> Result<(), ApiError> {
    form.validate()?;
    let token = form.token.trim();
    let mut user = state
        .users
        .find_by_reset_token(token)
        .await?
        .ok_or(UserError::InvalidToken)?;

    let new_hash = hash_password(&form.password)?;
    match user.reset_password(token, new_hash, Utc::now()) {
        Ok(()) => {
            state.users.save(&user).await?;
            info!(email = %user.email, "Password reset");
            Ok(())
        }
        Err(UserError::TokenExpired) => {
            // the expired token was cleared on the entity
            state.users.save(&user).await?;
            Err(UserError::TokenExpired.into())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn profile(state: &AppState, email: &Email) -> Result<User, ApiError> {
    Ok(state.users.get(email).await?)
}

/// Applies the profile form (`nama`, `no_telepon`, `alamat`, `foto`)
///
/// A new photo replaces the old one, which is then removed from storage.
/// If the update fails the new photo is removed instead.
pub async fn update_profile(
    state: &AppState,
    email: &Email,
    mut form: MultipartForm,
) -> Result<User, ApiError> {
    let mut user = state.users.get(email).await?;

    if let Some(name) = form.text("nama") {
        validation::check_name(name).map_err(|m| ApiError::field("nama", m))?;
    }
    if let Some(phone) = form.text("no_telepon").filter(|p| !p.trim().is_empty()) {
        validation::check_phone(phone).map_err(|m| ApiError::field("no_telepon", m))?;
    }

    let photo = match form.take_file("foto") {
        Some(file) => Some(
            state
                .files
                .save(UploadCategory::ProfilePhoto, &file.file_name, &file.bytes)
                .await?,
        ),
        None => None,
    };

    let update = ProfileUpdate {
        name: form.text("nama").map(str::to_string),
        phone: form.text("no_telepon").map(str::to_string),
        address: form.text("alamat").map(str::to_string),
        photo: photo.clone(),
    };

    let outcome = match user.apply_profile(update) {
        Ok(replaced) => state.users.save(&user).await.map(|_| replaced).map_err(ApiError::from),
        Err(e) => Err(e.into()),
    };

    match outcome {
        Ok(replaced) => {
            if let Some(old) = replaced {
                discard_upload(state, &old).await;
            }
            info!(email = %user.email, "Profile updated");
            Ok(user)
        }
        Err(e) => {
            if let Some(new) = photo {
                discard_upload(state, &new).await;
            }
            Err(e)
        }
    }
}

/// Creates the configured admin account on first start
pub async fn ensure_admin(
    users: &dyn UserPort,
    email: &str,
    name: &str,
    password: &str,
) -> Result<(), ApiError> {
    let email = Email::parse(email).map_err(|_| ApiError::field("email", "Format email tidak valid"))?;
    if users.find_by_email(&email).await?.is_some() {
        info!(email = %email, "Admin account present");
        return Ok(());
    }
    validation::check_password(password).map_err(|m| ApiError::field("password", m))?;

    let admin = User::admin(email, name, hash_password(password)?);
    users.insert(&admin).await?;
    info!(email = %admin.email, "Admin account created");
    Ok(())
}

/// Removes a stored upload that no record refers to any more
///
/// Failures are logged; the request that triggered the cleanup has already
/// succeeded or failed on its own terms.
pub(crate) async fn discard_upload(state: &AppState, path: &str) {
    if let Err(e) = state.files.remove(path).await {
        warn!(path = %path, error = %e, "Failed to remove upload");
    }
}
