use thiserror::Error;

/// Error type for token operations.
///
/// Verification failures are collapsed into the single `Invalid` variant:
/// callers cannot distinguish an expired token from a malformed or forged
/// one, so rejection responses carry no information about which check
/// failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Signing secret is not configured")]
    MissingSecret,

    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Invalid token")]
    Invalid,
}
