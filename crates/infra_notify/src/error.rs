//! Notification errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Template error: {0}")]
    Template(String),

    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Message(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),
}

impl From<handlebars::RenderError> for NotifyError {
    fn from(error: handlebars::RenderError) -> Self {
        NotifyError::Template(error.to_string())
    }
}

impl From<handlebars::TemplateError> for NotifyError {
    fn from(error: handlebars::TemplateError) -> Self {
        NotifyError::Template(error.to_string())
    }
}

impl From<lettre::address::AddressError> for NotifyError {
    fn from(error: lettre::address::AddressError) -> Self {
        NotifyError::Address(error.to_string())
    }
}

impl From<lettre::error::Error> for NotifyError {
    fn from(error: lettre::error::Error) -> Self {
        NotifyError::Message(error.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for NotifyError {
    fn from(error: lettre::transport::smtp::Error) -> Self {
        NotifyError::Transport(error.to_string())
    }
}
