// ABOUTME: Error types for mailserver container access and alias management
// Display strings double as the text of error toasts

use crate::models::ErrorResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailserverError {
    #[error("Docker connection error: {0}")]
    Connection(#[from] bollard::errors::Error),

    #[error("mailserver container not found")]
    ContainerNotFound,

    #[error("alias not found")]
    AliasNotFound,

    #[error("Alias already exists")]
    AliasExists,

    #[error("Email does not exist")]
    EmailNotFound,

    #[error("Invalid alias")]
    InvalidAlias,

    #[error("Alias must be provided")]
    MissingAlias,

    #[error("Command execution failed: {0}")]
    Exec(String),
}

impl From<&MailserverError> for ErrorResponse {
    fn from(error: &MailserverError) -> Self {
        Self::new(error.to_string())
    }
}
