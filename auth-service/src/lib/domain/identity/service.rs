use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::PasswordError;
use auth::StoredCredential;

use crate::identity::errors::IdentityError;
use crate::identity::models::AccessToken;
use crate::identity::models::LoginCommand;
use crate::identity::models::Subject;
use crate::identity::ports::CredentialStore;
use crate::identity::ports::IdentityServicePort;

/// Domain service implementation for login and token validation.
///
/// Concrete implementation of IdentityServicePort with dependency injection.
pub struct IdentityService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    authenticator: Arc<Authenticator>,
}

impl<CS> IdentityService<CS>
where
    CS: CredentialStore,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential lookup implementation
    /// * `authenticator` - Password verification and token issuance
    pub fn new(store: Arc<CS>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }
}

#[async_trait]
impl<CS> IdentityServicePort for IdentityService<CS>
where
    CS: CredentialStore,
{
    async fn login(&self, command: LoginCommand) -> Result<AccessToken, IdentityError> {
        let LoginCommand { username, password } = command;

        let record = self.store.lookup(&username).await.map_err(|e| {
            tracing::error!(username = %username, error = %e, "Credential lookup failed");
            e
        })?;

        // Password hashing is CPU-bound; keep it off the async workers. The
        // request still waits for it.
        let authenticator = Arc::clone(&self.authenticator);
        let outcome = tokio::task::spawn_blocking(move || match &record {
            Some(record) => {
                let subject = record.id.to_string();
                let credential = StoredCredential {
                    subject: &subject,
                    password_hash: &record.password_hash,
                };
                authenticator.authenticate(password.expose(), Some(credential))
            }
            None => authenticator.authenticate(password.expose(), None),
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password verification task failed");
            IdentityError::Internal(e.to_string())
        })?;

        match outcome {
            Ok(result) => {
                tracing::info!(
                    username = %username,
                    subject = %result.claims.sub,
                    expires_at = result.claims.exp,
                    "Identity authenticated"
                );
                Ok(AccessToken::from(result))
            }
            Err(AuthenticationError::UnknownIdentity) => {
                tracing::warn!(username = %username, reason = "unknown username", "Login failed");
                Err(IdentityError::NotFound(username.to_string()))
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!(username = %username, reason = "wrong password", "Login failed");
                Err(IdentityError::InvalidCredentials)
            }
            Err(AuthenticationError::PasswordError(PasswordError::MalformedHash(e))) => {
                tracing::error!(username = %username, error = %e, "Stored password hash is malformed");
                Err(IdentityError::CorruptPasswordHash(username.to_string()))
            }
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::error!(username = %username, error = %e, "Password verification failed");
                Err(IdentityError::Internal(e.to_string()))
            }
            Err(AuthenticationError::JwtError(e)) => {
                tracing::error!(username = %username, error = %e, "Token signing failed");
                Err(IdentityError::SigningFailure(e.to_string()))
            }
        }
    }

    fn validate(&self, token: &str) -> Result<Subject, IdentityError> {
        self.authenticator
            .validate_token(token)
            .map(|claims| {
                tracing::debug!(subject = %claims.sub, "Token validated");
                Subject::new(claims.sub)
            })
            .map_err(|e| {
                tracing::warn!(reason = %e, "Token validation failed");
                IdentityError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use auth::Claims;
    use auth::HashScheme;
    use auth::PasswordHasher;
    use auth::SigningKey;
    use auth::TokenPolicy;
    use mockall::mock;

    use super::*;
    use crate::identity::models::IdentityId;
    use crate::identity::models::IdentityRecord;
    use crate::identity::models::Password;
    use crate::identity::models::Username;

    const SECRET: &str = "test_secret_key_at_least_32_bytes!";

    // Define mocks in the test module using mockall
    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn lookup(&self, username: &Username) -> Result<Option<IdentityRecord>, IdentityError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(
            Authenticator::new(
                &SigningKey::new(SECRET).unwrap(),
                TokenPolicy::default(),
                PasswordHasher::with_scheme(HashScheme::Bcrypt { cost: 4 }),
            )
            .unwrap(),
        )
    }

    fn alice(authenticator: &Authenticator) -> IdentityRecord {
        IdentityRecord {
            id: IdentityId(1),
            username: Username::new("alice".to_string()).unwrap(),
            password_hash: authenticator.hash_password("correcthorse").unwrap(),
        }
    }

    fn command(username: &str, password: &str) -> LoginCommand {
        LoginCommand::new(
            Username::new(username.to_string()).unwrap(),
            Password::new(password.to_string()).unwrap(),
        )
    }

    fn service_with_alice() -> IdentityService<MockTestCredentialStore> {
        let authenticator = authenticator();
        let record = alice(&authenticator);

        let mut store = MockTestCredentialStore::new();
        store.expect_lookup().returning(move |username| {
            Ok((username.as_str() == "alice").then(|| record.clone()))
        });

        IdentityService::new(Arc::new(store), authenticator)
    }

    #[tokio::test]
    async fn test_login_then_validate_returns_subject() {
        let service = service_with_alice();

        let token = service
            .login(command("alice", "correcthorse"))
            .await
            .expect("Login failed");

        assert_eq!(token.subject.as_str(), "1");
        assert_eq!(token.lifetime_seconds(), 15 * 60);

        let subject = service.validate(&token.token).expect("Validation failed");
        assert_eq!(subject.as_str(), "1");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let service = service_with_alice();

        let result = service.login(command("alice", "wrong")).await;
        assert_eq!(result, Err(IdentityError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_username() {
        let service = service_with_alice();

        let result = service.login(command("bob", "anything")).await;
        assert!(matches!(result, Err(IdentityError::NotFound(name)) if name == "bob"));
    }

    #[tokio::test]
    async fn test_login_lookup_is_exact() {
        let service = service_with_alice();

        let result = service.login(command("Alice", "correcthorse")).await;
        assert!(matches!(result, Err(IdentityError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_login_storage_failure() {
        let mut store = MockTestCredentialStore::new();
        store
            .expect_lookup()
            .times(1)
            .returning(|_| Err(IdentityError::StorageFailure("connection refused".to_string())));

        let service = IdentityService::new(Arc::new(store), authenticator());

        let result = service.login(command("alice", "correcthorse")).await;
        assert!(matches!(result, Err(IdentityError::StorageFailure(_))));
    }

    #[tokio::test]
    async fn test_login_corrupt_hash() {
        let mut store = MockTestCredentialStore::new();
        store.expect_lookup().times(1).returning(|username| {
            Ok(Some(IdentityRecord {
                id: IdentityId(7),
                username: username.clone(),
                password_hash: "plaintext-by-mistake".to_string(),
            }))
        });

        let service = IdentityService::new(Arc::new(store), authenticator());

        let result = service.login(command("carol", "whatever")).await;
        assert!(matches!(result, Err(IdentityError::CorruptPasswordHash(name)) if name == "carol"));
    }

    #[tokio::test]
    async fn test_validate_garbage() {
        let service = service_with_alice();
        assert_eq!(service.validate("garbage"), Err(IdentityError::InvalidToken));
    }

    #[tokio::test]
    async fn test_validate_expired_token() {
        let service = service_with_alice();
        let authenticator = authenticator();

        let now = chrono::Utc::now().timestamp();
        let claims = Claims::new("1", &TokenPolicy::default(), now - 60).with_expiration(now - 1);
        let token = authenticator.jwt_handler().sign(&claims).unwrap();

        assert_eq!(service.validate(&token), Err(IdentityError::InvalidToken));
    }

    #[tokio::test]
    async fn test_validate_token_from_other_key() {
        let service = service_with_alice();
        let other = Authenticator::new(
            &SigningKey::new("another_secret_key_at_least_32_bytes").unwrap(),
            TokenPolicy::default(),
            PasswordHasher::with_scheme(HashScheme::Bcrypt { cost: 4 }),
        )
        .unwrap();

        let token = other.jwt_handler().issue("1").unwrap().token;
        assert_eq!(service.validate(&token), Err(IdentityError::InvalidToken));
    }
}
