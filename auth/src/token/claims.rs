use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::role::Role;

/// Signed claim set carried by a bearer token.
///
/// Unlike a general-purpose claims map, every field is required: a token
/// missing any of them, or carrying a role outside the closed enumeration,
/// fails deserialization and therefore fails verification as a whole.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (user identifier, canonical string form)
    pub sub: String,
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    /// Build a claim set expiring `ttl` from now.
    ///
    /// `ttl` may be negative; the resulting token is then already expired,
    /// which is how the expiry path is exercised in tests.
    pub fn new(subject_id: impl ToString, role: Role, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: subject_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}
