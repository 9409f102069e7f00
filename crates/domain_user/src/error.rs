//! User domain errors

use thiserror::Error;

/// Errors that can occur in the user domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Deliberately does not say whether the email or the password was wrong
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email address not verified")]
    NotVerified,

    #[error("Invalid or unknown token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Invalid user data: {0}")]
    InvalidData(String),
}

impl UserError {
    /// Creates an InvalidData error with a message
    pub fn invalid(message: impl Into<String>) -> Self {
        UserError::InvalidData(message.into())
    }
}
