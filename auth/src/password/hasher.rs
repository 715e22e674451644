use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Cost factor used by the seed data of existing deployments.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

const BCRYPT_PREFIXES: [&str; 4] = ["$2a$", "$2b$", "$2x$", "$2y$"];
const ARGON2_PREFIX: &str = "$argon2";

/// Scheme used when producing new hashes.
///
/// Verification does not depend on this: stored hashes carry their own
/// algorithm, parameters and salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    Bcrypt { cost: u32 },
    Argon2id,
}

impl Default for HashScheme {
    fn default() -> Self {
        HashScheme::Bcrypt {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

/// Password hashing implementation.
///
/// Hashes with the configured [`HashScheme`] and verifies bcrypt (`$2?$`) and
/// Argon2 (PHC string) hashes. Both comparisons are salted and adaptive; their
/// running time is governed by the cost parameters, not by the input.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    scheme: HashScheme,
}

impl PasswordHasher {
    /// Create a new password hasher with the default scheme (bcrypt, cost 10).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a password hasher producing hashes with `scheme`.
    pub fn with_scheme(scheme: HashScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> HashScheme {
        self.scheme
    }

    /// Hash a plaintext password securely.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Self-describing hash string (algorithm, parameters, salt, digest)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed (e.g. bcrypt cost out of range)
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        match self.scheme {
            HashScheme::Bcrypt { cost } => bcrypt::hash(password, cost)
                .map_err(|e| PasswordError::HashingFailed(e.to_string())),
            HashScheme::Argon2id => {
                let salt = SaltString::generate(&mut OsRng);

                Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| PasswordError::HashingFailed(e.to_string()))
            }
        }
    }

    /// Verify a password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash (bcrypt or Argon2 PHC string)
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash` - Stored hash is not a recognizable bcrypt or Argon2 hash
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        if BCRYPT_PREFIXES.iter().any(|prefix| hash.starts_with(prefix)) {
            return bcrypt::verify(password, hash)
                .map_err(|e| PasswordError::MalformedHash(e.to_string()));
        }

        if hash.starts_with(ARGON2_PREFIX) {
            return Self::verify_argon2(password, hash);
        }

        Err(PasswordError::MalformedHash(
            "Unrecognized hash format".to_string(),
        ))
    }

    fn verify_argon2(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
        }
    }
}
