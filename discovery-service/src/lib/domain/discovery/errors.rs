use thiserror::Error;

use crate::user::errors::UserIdError;

/// Error for DiscoveryId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiscoveryIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Title validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TitleError {
    #[error("Title too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for Content validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("Content too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Error for Slug validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("Invalid slug: {0}")]
    Invalid(String),
}

/// Error for ImageUrl validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageUrlError {
    #[error("Invalid image URL: {0}")]
    InvalidFormat(String),
}

/// Error for status tag parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiscoveryStatusError {
    #[error("Unknown status: {0}")]
    Unknown(String),
}

/// Top-level error for all discovery-related operations
#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid discovery ID: {0}")]
    InvalidId(#[from] DiscoveryIdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] TitleError),

    #[error("Invalid content: {0}")]
    InvalidContent(#[from] ContentError),

    #[error("Invalid slug: {0}")]
    InvalidSlug(#[from] SlugError),

    #[error("Invalid image URL: {0}")]
    InvalidImageUrl(#[from] ImageUrlError),

    #[error("Invalid status: {0}")]
    InvalidStatus(#[from] DiscoveryStatusError),

    #[error("Invalid author ID: {0}")]
    InvalidAuthor(#[from] UserIdError),

    // Domain-level errors
    #[error("Discovery not found: {0}")]
    NotFound(String),

    #[error("Slug already exists: {0}")]
    SlugAlreadyExists(String),

    /// Ownership or role denial. The message never names the actual owner.
    #[error("Insufficient permissions")]
    Forbidden,

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}
