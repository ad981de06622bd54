use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Argon2id with a configurable iteration cost. Each `hash` call draws a
/// fresh random salt, so identical plaintexts produce different outputs;
/// verification goes through the PHC verifier, which compares digests in
/// constant time.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a hasher with the process-wide cost factor (iteration count).
    ///
    /// A zero cost is raised to the minimum the algorithm accepts; memory
    /// and parallelism stay at the library defaults.
    pub fn new(cost: u32) -> Self {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            cost.max(Params::MIN_T_COST),
            Params::DEFAULT_P_COST,
            None,
        )
        .unwrap_or_default();

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hash a plaintext password securely.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - hashing operation failed; this is fatal and maps
    ///   to a 500-class response upstream
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// # Returns
    /// True if the password matches, false otherwise. A mismatch is never an
    /// error.
    ///
    /// # Errors
    /// * `VerificationFailed` - the stored hash is not a parseable PHC string
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Params::DEFAULT_T_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(2);
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");

        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));
        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_identical_plaintexts_hash_differently() {
        let hasher = PasswordHasher::new(2);

        let first = hasher.hash("same_password").unwrap();
        let second = hasher.hash("same_password").unwrap();

        // random salt per call
        assert_ne!(first, second);
        assert!(hasher.verify("same_password", &first).unwrap());
        assert!(hasher.verify("same_password", &second).unwrap());
    }

    #[test]
    fn test_cost_is_reflected_in_hash() {
        let hasher = PasswordHasher::new(4);
        let hash = hasher.hash("password").unwrap();
        assert!(hash.contains(",t=4,"));
    }

    #[test]
    fn test_zero_cost_is_raised_to_minimum() {
        let hasher = PasswordHasher::new(0);
        let hash = hasher.hash("password").unwrap();
        assert!(hasher.verify("password", &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new(2);
        assert!(hasher.verify("password", "not_a_phc_string").is_err());
    }
}
