//! User aggregate

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{Email, Role};
use crate::error::UserError;
use crate::validation;

/// How long a password reset link stays valid
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Natural key
    pub email: Email,
    /// Display name (`nama`)
    pub name: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    /// `no_telepon`
    pub phone: Option<String>,
    /// `alamat`
    pub address: Option<String>,
    /// Stored path of the profile photo
    pub photo: Option<String>,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for a self-service registration
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub name: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Profile edit; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub photo: Option<String>,
}

impl User {
    /// Creates an unverified `user` account with a fresh verification token
    pub fn register(new: NewUser) -> Result<Self, UserError> {
        validation::check_name(&new.name).map_err(UserError::invalid)?;
        let phone = normalize_optional(new.phone);
        if let Some(ref phone) = phone {
            validation::check_phone(phone).map_err(UserError::invalid)?;
        }
        let address = normalize_optional(new.address);
        if let Some(ref address) = address {
            validation::check_address(address).map_err(UserError::invalid)?;
        }

        let now = Utc::now();
        Ok(Self {
            email: new.email,
            name: new.name.trim().to_string(),
            password_hash: new.password_hash,
            role: Role::User,
            phone,
            address,
            photo: None,
            is_verified: false,
            verification_token: Some(generate_token()),
            reset_token: None,
            reset_token_expires_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates an already-verified admin account (used for bootstrapping)
    pub fn admin(email: Email, name: impl Into<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            email,
            name: name.into(),
            password_hash,
            role: Role::Admin,
            phone: None,
            address: None,
            photo: None,
            is_verified: true,
            verification_token: None,
            reset_token: None,
            reset_token_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Confirms the email address
    ///
    /// Verifying an already-verified account is a no-op so that a second
    /// click on the link does not show an error.
    pub fn verify_email(&mut self, token: &str) -> Result<(), UserError> {
        if self.is_verified {
            return Ok(());
        }
        match self.verification_token.as_deref() {
            Some(expected) if expected == token => {
                self.is_verified = true;
                self.verification_token = None;
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(UserError::InvalidToken),
        }
    }

    /// Issues a new password reset token, replacing any previous one
    pub fn issue_reset_token(&mut self, now: DateTime<Utc>) -> String {
        let token = generate_token();
        self.reset_token = Some(token.clone());
        self.reset_token_expires_at = Some(now + Duration::minutes(RESET_TOKEN_TTL_MINUTES));
        self.updated_at = now;
        token
    }

    /// Replaces the password if `token` matches the outstanding reset token
    pub fn reset_password(
        &mut self,
        token: &str,
        new_password_hash: String,
        now: DateTime<Utc>,
    ) -> Result<(), UserError> {
        if self.reset_token.as_deref() != Some(token) {
            return Err(UserError::InvalidToken);
        }
        match self.reset_token_expires_at {
            Some(expires_at) if expires_at > now => {}
            _ => {
                self.reset_token = None;
                self.reset_token_expires_at = None;
                return Err(UserError::TokenExpired);
            }
        }

        self.password_hash = new_password_hash;
        self.reset_token = None;
        self.reset_token_expires_at = None;
        self.updated_at = now;
        Ok(())
    }

    /// Applies a profile edit
    ///
    /// All fields are validated before any is changed. Returns the path of
    /// the photo that was replaced, if any, so the caller can remove the old
    /// file.
    pub fn apply_profile(&mut self, update: ProfileUpdate) -> Result<Option<String>, UserError> {
        if let Some(ref name) = update.name {
            validation::check_name(name).map_err(UserError::invalid)?;
        }
        let phone = update.phone.map(|p| normalize_optional(Some(p)));
        if let Some(Some(ref phone)) = phone {
            validation::check_phone(phone).map_err(UserError::invalid)?;
        }
        let address = update.address.map(|a| normalize_optional(Some(a)));
        if let Some(Some(ref address)) = address {
            validation::check_address(address).map_err(UserError::invalid)?;
        }

        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(phone) = phone {
            self.phone = phone;
        }
        if let Some(address) = address {
            self.address = address;
        }
        let replaced = match update.photo {
            Some(photo) => self.photo.replace(photo),
            None => None,
        };
        self.updated_at = Utc::now();
        Ok(replaced)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
