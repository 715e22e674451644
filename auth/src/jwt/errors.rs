use thiserror::Error;

/// Error type for JWT operations.
///
/// Variants name the exact check that failed. They are meant for logs; callers
/// facing untrusted clients should collapse them into a single outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Unexpected signing algorithm: {0}")]
    AlgorithmMismatch(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token issued in the future")]
    IssuedInFuture,

    #[error("Token issuer is invalid")]
    InvalidIssuer,

    #[error("Token audience is invalid")]
    InvalidAudience,

    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    #[error("Signing key is invalid: {0}")]
    InvalidKey(String),
}
