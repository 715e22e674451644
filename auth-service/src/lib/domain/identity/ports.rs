use async_trait::async_trait;

use crate::identity::errors::IdentityError;
use crate::identity::models::AccessToken;
use crate::identity::models::IdentityRecord;
use crate::identity::models::LoginCommand;
use crate::identity::models::Subject;
use crate::identity::models::Username;

/// Port for identity domain service operations.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Verify a username/password pair and issue a signed token.
    ///
    /// # Arguments
    /// * `command` - Validated username and password
    ///
    /// # Returns
    /// Signed access token for the identity
    ///
    /// # Errors
    /// * `NotFound` - No identity with this username
    /// * `InvalidCredentials` - Password does not match
    /// * `StorageFailure` - Credential store unreachable or returned bad data
    /// * `CorruptPasswordHash` - Stored hash cannot be parsed
    /// * `SigningFailure` - Token could not be signed
    async fn login(&self, command: LoginCommand) -> Result<AccessToken, IdentityError>;

    /// Validate a previously issued token.
    ///
    /// # Returns
    /// Subject carried by the token
    ///
    /// # Errors
    /// * `InvalidToken` - Any structural, signature, algorithm, issuer, audience or time failure
    fn validate(&self, token: &str) -> Result<Subject, IdentityError>;
}

/// Read-only lookup of stored credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve the identity registered under `username`.
    ///
    /// # Returns
    /// Optional identity record (None if not found)
    ///
    /// # Errors
    /// * `StorageFailure` - Connection, timeout or malformed row data
    async fn lookup(&self, username: &Username) -> Result<Option<IdentityRecord>, IdentityError>;
}
