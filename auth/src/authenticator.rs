use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SigningKey;
use crate::jwt::TokenPolicy;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT issuance.
///
/// Holds a dummy hash produced with the configured scheme so that an unknown
/// identity costs one full password verification, like a known one.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    dummy_hash: String,
}

/// Stored credential of a known identity.
#[derive(Debug, Clone, Copy)]
pub struct StoredCredential<'a> {
    /// Token subject for this identity
    pub subject: &'a str,
    /// Self-describing password hash
    pub password_hash: &'a str,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
    /// Claims embedded in the token
    pub claims: Claims,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Unknown identity")]
    UnknownIdentity,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    const DUMMY_PASSWORD: &'static str = "timing-parity-placeholder";

    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `signing_key` - Secret key for JWT signing
    /// * `policy` - Token issuer, audience and lifetime
    /// * `password_hasher` - Hasher whose scheme and cost match the stored hashes
    ///
    /// # Errors
    /// * `PasswordError` - The dummy hash could not be produced (e.g. invalid cost)
    pub fn new(
        signing_key: &SigningKey,
        policy: TokenPolicy,
        password_hasher: PasswordHasher,
    ) -> Result<Self, PasswordError> {
        let dummy_hash = password_hasher.hash(Self::DUMMY_PASSWORD)?;

        Ok(Self {
            password_hasher,
            jwt_handler: JwtHandler::new(signing_key, policy),
            dummy_hash,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a JWT token.
    ///
    /// Always performs exactly one password verification. When `credential` is
    /// `None` the password is checked against the dummy hash and the outcome is
    /// discarded.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `credential` - Stored credential, or `None` if the identity does not exist
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `UnknownIdentity` - No credential was supplied
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is malformed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        credential: Option<StoredCredential<'_>>,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let Some(credential) = credential else {
            let _ = self.password_hasher.verify(password, &self.dummy_hash);
            return Err(AuthenticationError::UnknownIdentity);
        };

        let is_valid = self
            .password_hasher
            .verify(password, credential.password_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let issued = self.jwt_handler.issue(credential.subject)?;

        Ok(AuthenticationResult {
            access_token: issued.token,
            claims: issued.claims,
        })
    }

    /// Validate and decode a JWT token.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.validate(token)
    }

    pub fn jwt_handler(&self) -> &JwtHandler {
        &self.jwt_handler
    }
}
