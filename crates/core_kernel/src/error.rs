//! Errors raised while parsing the shared vocabulary types

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),
}
