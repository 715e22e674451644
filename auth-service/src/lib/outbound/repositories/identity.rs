use async_trait::async_trait;
use sqlx::PgPool;

use crate::identity::errors::IdentityError;
use crate::identity::models::IdentityId;
use crate::identity::models::IdentityRecord;
use crate::identity::models::Username;
use crate::identity::ports::CredentialStore;

/// Credential store backed by the `users` table.
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct IdentityRow {
    id: i32,
    username: String,
    password_hash: String,
}

impl TryFrom<IdentityRow> for IdentityRecord {
    type Error = IdentityError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username).map_err(|e| {
            IdentityError::StorageFailure(format!("Row {} has invalid username: {}", row.id, e))
        })?;

        Ok(IdentityRecord {
            id: IdentityId(row.id),
            username,
            password_hash: row.password_hash,
        })
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn lookup(&self, username: &Username) -> Result<Option<IdentityRecord>, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::StorageFailure(e.to_string()))?;

        row.map(IdentityRecord::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(username: String) -> IdentityRow {
        IdentityRow {
            id: 3,
            username,
            password_hash: "$2b$04$hash".to_string(),
        }
    }

    #[test]
    fn test_multibyte_username_row_converts() {
        let record = IdentityRecord::try_from(row("é".repeat(200))).expect("Row rejected");

        assert_eq!(record.id, IdentityId(3));
        assert_eq!(record.username.as_str().chars().count(), 200);
    }

    #[test]
    fn test_empty_username_row_is_storage_failure() {
        assert!(matches!(
            IdentityRecord::try_from(row(String::new())),
            Err(IdentityError::StorageFailure(_))
        ));
    }
}
