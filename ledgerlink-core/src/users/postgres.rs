use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;

use super::{DuplicateUsername, NewUser, UserIdentity, UserRepository};

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl fmt::Debug for PostgresUserRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresUserRepository").finish()
    }
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: NewUser) -> Result<UserIdentity> {
        let created = sqlx::query_as::<_, UserIdentity>(
            r#"
            INSERT INTO users (id, username, password_hash, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, email, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                anyhow::Error::new(DuplicateUsername)
            }
            other => anyhow::Error::from(other),
        })?;

        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserIdentity>> {
        let user = sqlx::query_as::<_, UserIdentity>(
            r#"
            SELECT id, username, password_hash, email, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
