use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// The stored hash cannot be parsed. This points at corrupt data, not a wrong password.
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),
}
