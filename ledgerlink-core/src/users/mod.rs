//! User identity records and the credential store.
//!
//! The credential store owns [`UserIdentity`] exclusively: a record is created on
//! registration and immutable afterwards except for credential rotation, which the
//! model permits by keeping the password hash a plain updatable column.

mod postgres;

pub use postgres::PostgresUserRepository;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A registered user. The `password_hash` is a PHC-format Argon2id string; the
/// plaintext password is never stored.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserIdentity {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Reported by [`UserRepository::insert`] when the username is already taken.
///
/// The unique index is the authority here: two concurrent registrations can
/// both pass the pre-insert lookup, so the losing insert must still surface as
/// a duplicate rather than a generic storage failure.
#[derive(Debug, thiserror::Error)]
#[error("username already taken")]
pub struct DuplicateUsername;

/// Insert payload for a new user record.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
}

/// Storage port for user identities.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<UserIdentity>;
    async fn find_by_username(&self, username: &str) -> Result<Option<UserIdentity>>;
}
