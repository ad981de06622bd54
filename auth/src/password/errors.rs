use thiserror::Error;

/// Error type for password operations.
///
/// A mismatching password is not an error; `verify` reports it as a plain
/// `false`. These variants cover environment-level failures only.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
