use crate::role::Role;

/// Verified identity attached to a request after token validation.
///
/// A `Principal` is only ever constructed from a token that passed full
/// signature and claim validation; partially decoded claim sets never become
/// one. It lives for the duration of a single request and is not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Stable user identifier in canonical string form
    pub subject_id: String,
    pub role: Role,
    /// Unix timestamp the backing token was issued at
    pub issued_at: i64,
}
