use std::fmt;

use secrecy::ExposeSecret;
use secrecy::SecretString;

use crate::identity::errors::PasswordInputError;
use crate::identity::errors::UsernameError;

/// Stored principal, as read from the credential store.
///
/// The core never creates or modifies these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    pub id: IdentityId,
    pub username: Username,
    pub password_hash: String,
}

/// Identity unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityId(pub i32);

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Compared exactly: no trimming, case folding or Unicode normalization.
/// Length is counted in characters, matching the `VARCHAR(255)` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MAX_LENGTH: usize = 255;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `Empty` - Username is the empty string
    /// * `TooLong` - Username longer than 255 characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        if username.is_empty() {
            return Err(UsernameError::Empty);
        }

        let length = username.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(username))
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password supplied at login. Redacted in `Debug` output.
#[derive(Debug)]
pub struct Password(SecretString);

impl Password {
    // Bounds the work a single request can ask the hasher to do.
    const MAX_LENGTH: usize = 1024;

    /// Wrap a plaintext password.
    ///
    /// # Errors
    /// * `Empty` - Password is the empty string
    /// * `TooLong` - Password longer than 1024 bytes
    pub fn new(password: String) -> Result<Self, PasswordInputError> {
        if password.is_empty() {
            return Err(PasswordInputError::Empty);
        }

        if password.len() > Self::MAX_LENGTH {
            return Err(PasswordInputError::TooLong {
                max: Self::MAX_LENGTH,
                actual: password.len(),
            });
        }

        Ok(Self(SecretString::from(password)))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Command to authenticate an identity with validated inputs
#[derive(Debug)]
pub struct LoginCommand {
    pub username: Username,
    pub password: Password,
}

impl LoginCommand {
    pub fn new(username: Username, password: Password) -> Self {
        Self { username, password }
    }
}

/// Authenticated subject, as carried in the `sub` claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject(String);

impl Subject {
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Signed token handed back on successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub subject: Subject,
    /// Unix timestamp
    pub issued_at: i64,
    /// Unix timestamp
    pub expires_at: i64,
}

impl AccessToken {
    /// Seconds between issuance and expiry.
    pub fn lifetime_seconds(&self) -> i64 {
        self.expires_at - self.issued_at
    }
}

impl From<auth::AuthenticationResult> for AccessToken {
    fn from(result: auth::AuthenticationResult) -> Self {
        Self {
            token: result.access_token,
            subject: Subject::new(result.claims.sub),
            issued_at: result.claims.iat,
            expires_at: result.claims.exp,
        }
    }
}
