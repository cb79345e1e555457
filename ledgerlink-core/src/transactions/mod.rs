//! Transaction ingestion: pull provider transactions with a stored access
//! credential and persist them idempotently, scoped to the owning user.

mod postgres;
mod service;

pub use postgres::PostgresTransactionRepository;
pub use service::IngestService;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::provider::ProviderError;

/// One persisted transaction. Append-only; `provider_transaction_id` is the
/// stable identifier that keeps re-syncs idempotent per owner.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub provider_transaction_id: String,
    pub name: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Inclusive date range for a sync.
#[derive(Debug, Clone, Copy)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Range covering the trailing `days` days ending today (UTC). This is the
    /// default sync window when a request names no range.
    pub fn trailing_days(days: u32) -> Self {
        let end = Utc::now().date_naive();
        Self {
            start: end - Duration::days(i64::from(days)),
            end,
        }
    }
}

/// Storage port for transaction records.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Insert the given records, silently skipping any whose
    /// `(owner_id, provider_transaction_id)` already exists. Returns the number
    /// actually inserted.
    async fn insert_ignoring_duplicates(&self, records: &[TransactionRecord]) -> Result<u64>;

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<TransactionRecord>>;
}

/// Errors from transaction ingestion.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// No persisted access credential for this user; linking must happen first.
    #[error("no linked account for this user")]
    NoLinkedAccount,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
