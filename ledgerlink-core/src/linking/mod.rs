//! Link-token brokering and public-token exchange.
//!
//! The broker hands an authenticated subject a fresh provider link token; once
//! the client finishes the linking flow it submits the resulting public token,
//! which the coordinator exchanges exactly once for a durable
//! [`AccessCredential`]. The credential is persisted keyed by the owning user
//! before the exchange returns, so a follow-up transaction sync always sees it
//! (the store provides read-after-write consistency per key).

mod postgres;
mod service;

pub use postgres::PostgresAccessCredentialRepository;
pub use service::LinkService;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::provider::ProviderError;

/// Durable provider credential owned 1:1 by a user. Re-linking replaces the
/// stored row; it never accumulates.
#[derive(Clone, Serialize, sqlx::FromRow)]
pub struct AccessCredential {
    pub user_id: Uuid,
    pub access_token: String,
    pub item_id: String,
    pub linked_at: DateTime<Utc>,
}

// The access token never appears in Debug output or logs.
impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredential")
            .field("user_id", &self.user_id)
            .field("access_token", &"<redacted>")
            .field("item_id", &self.item_id)
            .field("linked_at", &self.linked_at)
            .finish()
    }
}

/// Storage port for access credentials, keyed by owning user.
#[async_trait]
pub trait AccessCredentialRepository: Send + Sync {
    /// Insert or replace the credential for `credential.user_id`.
    async fn upsert(&self, credential: &AccessCredential) -> Result<()>;
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<AccessCredential>>;
}

/// Errors from the broker and exchange coordinator.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
