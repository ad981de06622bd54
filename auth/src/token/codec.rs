use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::TokenClaims;
use super::errors::TokenError;
use crate::principal::Principal;
use crate::role::Role;

/// Signs claim sets into bearer tokens and verifies them back into
/// principals.
///
/// Uses HS256 (HMAC with SHA-256) with the single process-wide secret. The
/// codec is the only place a [`Principal`] is constructed from untrusted
/// input; everything downstream may treat the principal as verified.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("encoding_key", &"<redacted>")
            .field("decoding_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl TokenCodec {
    /// Create a codec from the configured signing secret.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (at least 32 bytes in
    ///   production; stored in configuration, never in code)
    ///
    /// # Errors
    /// * `MissingSecret` - the secret is empty. Token issuance must abort
    ///   rather than fall through to an unsigned scheme.
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        })
    }

    /// Sign a claim set for `subject_id` expiring `ttl` from now.
    ///
    /// # Errors
    /// * `SigningFailed` - the subject is empty, or encoding failed
    pub fn issue(
        &self,
        subject_id: &str,
        role: Role,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        if subject_id.is_empty() {
            return Err(TokenError::SigningFailed(
                "subject must not be empty".to_string(),
            ));
        }

        let claims = TokenClaims::new(subject_id, role, ttl);
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    /// Verify a token and derive the request principal from it.
    ///
    /// Checks, in order: structural well-formedness, signature, expiry,
    /// subject presence as a non-empty string, and role membership in the
    /// closed enumeration. Every failure is reported as the uniform
    /// `Invalid`; payloads that are not a claims object (e.g. a bare JSON
    /// string) fail the same way. There is no partial trust: either the
    /// whole claim set validates or no principal exists.
    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // expiry is checked against the wall clock with no grace window
        validation.leeway = 0;

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| TokenError::Invalid)?;

        let claims = token_data.claims;
        if claims.sub.is_empty() {
            return Err(TokenError::Invalid);
        }

        Ok(Principal {
            subject_id: claims.sub,
            role: claims.role,
            issued_at: claims.iat,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET).expect("Failed to create codec")
    }

    fn encode_raw<T: Serialize>(claims: &T) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("Failed to encode raw claims")
    }

    #[test]
    fn test_empty_secret_is_refused() {
        assert_eq!(TokenCodec::new(b"").unwrap_err(), TokenError::MissingSecret);
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let codec = codec();

        let token = codec
            .issue("user123", Role::Admin, Duration::hours(1))
            .expect("Failed to issue token");
        let principal = codec.verify(&token).expect("Failed to verify token");

        assert_eq!(principal.subject_id, "user123");
        assert_eq!(principal.role, Role::Admin);
        assert!(principal.issued_at > 0);
    }

    #[test]
    fn test_issue_refuses_empty_subject() {
        let result = codec().issue("", Role::User, Duration::hours(1));
        assert!(matches!(result, Err(TokenError::SigningFailed(_))));
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let codec = codec();

        let token = codec
            .issue("user123", Role::User, Duration::seconds(-1))
            .expect("Failed to issue token");

        assert_eq!(codec.verify(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let other = TokenCodec::new(b"another_secret_at_least_32_bytes!").unwrap();

        let token = codec()
            .issue("user123", Role::User, Duration::hours(1))
            .expect("Failed to issue token");

        assert_eq!(other.verify(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_every_byte_mutation_is_invalid() {
        let codec = codec();

        let token = codec
            .issue("user123", Role::User, Duration::hours(1))
            .expect("Failed to issue token");

        for i in 0..token.len() {
            let mut mutated: Vec<u8> = token.as_bytes().to_vec();
            mutated[i] = if mutated[i] == b'A' { b'B' } else { b'A' };
            let mutated = String::from_utf8(mutated).unwrap();

            assert_eq!(
                codec.verify(&mutated).unwrap_err(),
                TokenError::Invalid,
                "mutation at byte {} was accepted",
                i
            );
        }
    }

    #[test]
    fn test_garbage_is_invalid() {
        let codec = codec();
        assert_eq!(codec.verify("").unwrap_err(), TokenError::Invalid);
        assert_eq!(
            codec.verify("not.a.token").unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_primitive_string_payload_is_invalid() {
        // A validly signed token whose payload is a bare string rather than
        // a claims object must be rejected outright.
        let token = encode_raw(&"just a string");
        assert_eq!(codec().verify(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_empty_subject_claim_is_invalid() {
        let claims = TokenClaims::new("", Role::User, Duration::hours(1));
        let token = encode_raw(&claims);

        assert_eq!(codec().verify(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_foreign_role_is_invalid() {
        #[derive(Serialize)]
        struct ForeignClaims {
            sub: String,
            role: String,
            iat: i64,
            exp: i64,
        }

        let now = chrono::Utc::now().timestamp();
        let token = encode_raw(&ForeignClaims {
            sub: "user123".to_string(),
            role: "superuser".to_string(),
            iat: now,
            exp: now + 3600,
        });

        assert_eq!(codec().verify(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_missing_expiry_is_invalid() {
        #[derive(Serialize)]
        struct NoExpiry {
            sub: String,
            role: Role,
            iat: i64,
        }

        let token = encode_raw(&NoExpiry {
            sub: "user123".to_string(),
            role: Role::User,
            iat: chrono::Utc::now().timestamp(),
        });

        assert_eq!(codec().verify(&token).unwrap_err(), TokenError::Invalid);
    }
}
