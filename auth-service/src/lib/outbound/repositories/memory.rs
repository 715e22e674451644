use std::collections::HashMap;

use async_trait::async_trait;

use crate::identity::errors::IdentityError;
use crate::identity::models::IdentityRecord;
use crate::identity::models::Username;
use crate::identity::ports::CredentialStore;

/// Fixed set of identities held in memory.
///
/// Test double for the Postgres store; the server binary always uses Postgres.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    identities: HashMap<String, IdentityRecord>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, record: IdentityRecord) -> Self {
        self.insert(record);
        self
    }

    /// Add or replace the identity keyed by its username.
    pub fn insert(&mut self, record: IdentityRecord) {
        self.identities
            .insert(record.username.as_str().to_string(), record);
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn lookup(&self, username: &Username) -> Result<Option<IdentityRecord>, IdentityError> {
        Ok(self.identities.get(username.as_str()).cloned())
    }
}
