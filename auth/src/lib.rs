//! Authentication utilities library
//!
//! Provides the credential and token core used by the authentication service:
//! - Password verification (bcrypt and Argon2 hashes, self-describing)
//! - JWT issuance and strict HS256 validation
//! - Authentication coordination with timing parity for unknown identities
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{HashScheme, PasswordHasher};
//!
//! let hasher = PasswordHasher::with_scheme(HashScheme::Bcrypt { cost: 4 });
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{JwtHandler, SigningKey, TokenPolicy};
//!
//! let key = SigningKey::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let handler = JwtHandler::new(&key, TokenPolicy::default());
//! let issued = handler.issue("42").unwrap();
//! let claims = handler.validate(&issued.token).unwrap();
//! assert_eq!(claims.sub, "42");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, HashScheme, PasswordHasher, SigningKey, StoredCredential, TokenPolicy};
//!
//! let key = SigningKey::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(
//!     &key,
//!     TokenPolicy::default(),
//!     PasswordHasher::with_scheme(HashScheme::Bcrypt { cost: 4 }),
//! )
//! .unwrap();
//!
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let credential = StoredCredential { subject: "42", password_hash: &hash };
//! let result = auth.authenticate("password123", Some(credential)).unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.sub, "42");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authenticator::StoredCredential;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SigningKey;
pub use jwt::TokenPolicy;
pub use password::HashScheme;
pub use password::PasswordError;
pub use password::PasswordHasher;
