use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;

use super::{AccessCredential, AccessCredentialRepository};

pub struct PostgresAccessCredentialRepository {
    pool: PgPool,
}

impl fmt::Debug for PostgresAccessCredentialRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresAccessCredentialRepository").finish()
    }
}

impl PostgresAccessCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessCredentialRepository for PostgresAccessCredentialRepository {
    async fn upsert(&self, credential: &AccessCredential) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO access_credentials (user_id, access_token, item_id, linked_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET access_token = EXCLUDED.access_token,
                item_id = EXCLUDED.item_id,
                linked_at = EXCLUDED.linked_at
            "#,
        )
        .bind(credential.user_id)
        .bind(&credential.access_token)
        .bind(&credential.item_id)
        .bind(credential.linked_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<AccessCredential>> {
        let credential = sqlx::query_as::<_, AccessCredential>(
            r#"
            SELECT user_id, access_token, item_id, linked_at
            FROM access_credentials
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credential)
    }
}
