//! Authentication and authorization library
//!
//! Provides the reusable core of a bearer-token scheme:
//! - Password hashing (Argon2id, configurable cost)
//! - Token issuance and verification (HS256, single shared secret)
//! - Bearer-header resolution into a verified [`Principal`]
//! - Pure role/ownership policy decisions
//!
//! Services own their storage and transport; this crate never performs I/O.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new(2);
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Role, TokenCodec};
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let token = codec.issue("user123", Role::User, Duration::hours(1)).unwrap();
//! let principal = codec.verify(&token).unwrap();
//! assert_eq!(principal.subject_id, "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{policy, Authenticator, Role};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", 2, Duration::hours(24))
//!     .unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue a token
//! let issued = auth.login("password123", &hash, "user123", Role::User).unwrap();
//!
//! // Subsequent request: resolve the bearer header
//! let header = format!("Bearer {}", issued.access_token);
//! let principal = auth.resolve_bearer(Some(&header)).unwrap();
//!
//! // Authorize against the resource owner
//! assert!(policy::require_owner_or_role(&principal, "user123", &[Role::Admin]));
//! ```

pub mod authenticator;
pub mod password;
pub mod policy;
pub mod principal;
pub mod role;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthError;
pub use authenticator::Authenticator;
pub use authenticator::IssuedToken;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use principal::Principal;
pub use role::Role;
pub use role::RoleError;
pub use token::TokenClaims;
pub use token::TokenCodec;
pub use token::TokenError;
