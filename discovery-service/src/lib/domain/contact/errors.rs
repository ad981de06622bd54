use thiserror::Error;

use crate::user::errors::EmailError;

/// Validation error for contact submissions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContactValidationError {
    #[error("Name must be {min}-{max} characters")]
    InvalidName { min: usize, max: usize },

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Subject too long: maximum {max} characters")]
    SubjectTooLong { max: usize },

    #[error("Message too short: minimum {min} characters")]
    MessageTooShort { min: usize },

    #[error("Source too long: maximum {max} characters")]
    SourceTooLong { max: usize },
}

/// Top-level error for contact operations.
///
/// Notification failures are deliberately absent: a stored message whose
/// notification could not be sent is still a successful submission.
#[derive(Debug, Clone, Error)]
pub enum ContactError {
    #[error("Invalid contact message: {0}")]
    Validation(#[from] ContactValidationError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Error type for the notification collaborator.
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Invalid notifier configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to send notification: {0}")]
    SendFailed(String),
}
