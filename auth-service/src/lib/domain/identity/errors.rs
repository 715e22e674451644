use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for Password input validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordInputError {
    #[error("Password must not be empty")]
    Empty,

    #[error("Password too long: maximum {max} bytes, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for login and token validation.
///
/// Variants keep the internal distinction (unknown identity vs wrong password,
/// storage vs signing failure). The HTTP layer collapses them before they
/// reach a client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Identity not found: {0}")]
    NotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Corrupt password hash for identity: {0}")]
    CorruptPasswordHash(String),

    #[error("Token signing failed: {0}")]
    SigningFailure(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UsernameError> for IdentityError {
    fn from(err: UsernameError) -> Self {
        IdentityError::MalformedRequest(err.to_string())
    }
}

impl From<PasswordInputError> for IdentityError {
    fn from(err: PasswordInputError) -> Self {
        IdentityError::MalformedRequest(err.to_string())
    }
}
