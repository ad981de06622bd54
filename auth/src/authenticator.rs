use chrono::Duration;

use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::principal::Principal;
use crate::role::Role;
use crate::token::TokenCodec;
use crate::token::TokenError;

/// Authentication coordinator combining password verification, token
/// issuance, and bearer-header resolution.
///
/// One instance is built at process start from the configured secret, cost
/// factor, and token lifetime; it is immutable afterwards and shared across
/// requests without locking.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    token_ttl: Duration,
}

/// Result of a successful credential verification.
pub struct IssuedToken {
    /// Signed bearer token
    pub access_token: String,
}

/// Authentication operation errors.
///
/// `InvalidCredentials` covers both an unknown identifier and a wrong
/// password, so a login response carries no user-enumeration signal.
/// `NoToken` and `InvalidToken` are kept apart internally but collapse to
/// the same client-visible rejection at the transport boundary.
/// `Unauthenticated` means a guard ran without a prior mandatory-auth step;
/// that is a wiring mistake, not a role denial, and is never reported as
/// `Forbidden`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing bearer token")]
    NoToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl Authenticator {
    const BEARER_PREFIX: &'static str = "Bearer ";

    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `secret` - process-wide token signing secret
    /// * `hash_cost` - Argon2 iteration cost for newly hashed passwords
    /// * `token_ttl` - lifetime of issued tokens
    ///
    /// # Errors
    /// * `MissingSecret` - the secret is empty; startup must abort instead
    ///   of serving unsigned tokens
    pub fn new(secret: &[u8], hash_cost: u32, token_ttl: Duration) -> Result<Self, TokenError> {
        Ok(Self {
            password_hasher: PasswordHasher::new(hash_cost),
            token_codec: TokenCodec::new(secret)?,
            token_ttl,
        })
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a bearer token.
    ///
    /// Callers answering a login request must map a missing credential
    /// record to the same `InvalidCredentials` this returns on a password
    /// mismatch; the two cases must be indistinguishable to the client.
    ///
    /// # Errors
    /// * `InvalidCredentials` - password does not match
    /// * `Password` - stored hash was unparseable
    /// * `Token` - signing failed
    pub fn login(
        &self,
        password: &str,
        stored_hash: &str,
        subject_id: &str,
        role: Role,
    ) -> Result<IssuedToken, AuthError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.token_codec.issue(subject_id, role, self.token_ttl)?;

        Ok(IssuedToken { access_token })
    }

    /// Issue a token without verifying a password.
    ///
    /// Used right after registration, where the caller has just hashed the
    /// plaintext in the same request.
    pub fn issue_token(&self, subject_id: &str, role: Role) -> Result<String, TokenError> {
        self.token_codec.issue(subject_id, role, self.token_ttl)
    }

    /// Resolve an `Authorization` header value into a verified principal.
    ///
    /// # Errors
    /// * `NoToken` - header absent or not a `Bearer` scheme
    /// * `InvalidToken` - the token failed verification, for any reason
    pub fn resolve_bearer(&self, header_value: Option<&str>) -> Result<Principal, AuthError> {
        let header_value = header_value.ok_or(AuthError::NoToken)?;
        let token = header_value
            .strip_prefix(Self::BEARER_PREFIX)
            .ok_or(AuthError::NoToken)?;

        self.token_codec
            .verify(token)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Permissive variant of [`resolve_bearer`](Self::resolve_bearer).
    ///
    /// Never fails: an absent or invalid token yields `None` and the caller
    /// proceeds as an anonymous principal.
    pub fn resolve_bearer_optional(&self, header_value: Option<&str>) -> Option<Principal> {
        self.resolve_bearer(header_value).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn authenticator() -> Authenticator {
        Authenticator::new(SECRET, 2, Duration::hours(24)).expect("Failed to create authenticator")
    }

    #[test]
    fn test_empty_secret_is_fatal() {
        let result = Authenticator::new(b"", 2, Duration::hours(24));
        assert!(matches!(result, Err(TokenError::MissingSecret)));
    }

    #[test]
    fn test_login_then_resolve_round_trip() {
        let auth = authenticator();

        let hash = auth.hash_password("pass_word!").unwrap();
        let issued = auth
            .login("pass_word!", &hash, "user123", Role::User)
            .expect("Login failed");

        let header = format!("Bearer {}", issued.access_token);
        let principal = auth.resolve_bearer(Some(&header)).expect("Resolve failed");

        assert_eq!(principal.subject_id, "user123");
        assert_eq!(principal.role, Role::User);
    }

    #[test]
    fn test_login_wrong_password() {
        let auth = authenticator();

        let hash = auth.hash_password("pass_word!").unwrap();
        let result = auth.login("wrong_password", &hash, "user123", Role::User);

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_resolve_without_header() {
        let auth = authenticator();
        assert!(matches!(
            auth.resolve_bearer(None),
            Err(AuthError::NoToken)
        ));
    }

    #[test]
    fn test_resolve_without_bearer_scheme() {
        let auth = authenticator();
        assert!(matches!(
            auth.resolve_bearer(Some("Basic dXNlcjpwYXNz")),
            Err(AuthError::NoToken)
        ));
    }

    #[test]
    fn test_resolve_garbage_token() {
        let auth = authenticator();
        assert!(matches!(
            auth.resolve_bearer(Some("Bearer not.a.token")),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_resolve_optional_never_fails() {
        let auth = authenticator();

        assert!(auth.resolve_bearer_optional(None).is_none());
        assert!(auth.resolve_bearer_optional(Some("Bearer junk")).is_none());

        let token = auth.issue_token("user123", Role::Admin).unwrap();
        let header = format!("Bearer {}", token);
        let principal = auth.resolve_bearer_optional(Some(&header)).unwrap();
        assert_eq!(principal.role, Role::Admin);
    }
}
