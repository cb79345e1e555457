use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::{DateRange, IngestError, TransactionRecord, TransactionRepository};
use crate::linking::AccessCredentialRepository;
use crate::provider::AggregatorClient;

/// Transaction ingestor.
///
/// Requires a persisted access credential for the subject; the credential
/// lookup happens before any provider traffic, so an unlinked user costs no
/// upstream call. Sync is re-entrant: overlapping fetches are deduplicated by
/// provider transaction id at the storage layer.
pub struct IngestService {
    provider: Arc<dyn AggregatorClient>,
    credentials: Arc<dyn AccessCredentialRepository>,
    transactions: Arc<dyn TransactionRepository>,
    lookback_days: u32,
}

impl fmt::Debug for IngestService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestService")
            .field("lookback_days", &self.lookback_days)
            .finish_non_exhaustive()
    }
}

impl IngestService {
    /// `lookback_days` sets the default sync window: when a fetch names no
    /// range, it covers the trailing `lookback_days` days ending today.
    pub fn new(
        provider: Arc<dyn AggregatorClient>,
        credentials: Arc<dyn AccessCredentialRepository>,
        transactions: Arc<dyn TransactionRepository>,
        lookback_days: u32,
    ) -> Self {
        Self {
            provider,
            credentials,
            transactions,
            lookback_days,
        }
    }

    /// Fetch transactions for `subject` within `range` (default window when
    /// `None`) and persist them. Returns the fetched set tagged with the
    /// owner's id; records already stored from an earlier overlapping sync are
    /// returned but not inserted again.
    pub async fn fetch_and_store(
        &self,
        subject: Uuid,
        range: Option<DateRange>,
    ) -> Result<Vec<TransactionRecord>, IngestError> {
        let credential = self
            .credentials
            .find_by_user(subject)
            .await?
            .ok_or(IngestError::NoLinkedAccount)?;

        let range = range.unwrap_or_else(|| DateRange::trailing_days(self.lookback_days));

        let fetched = self
            .provider
            .list_transactions(&credential.access_token, range.start, range.end)
            .await?;

        let records: Vec<TransactionRecord> = fetched
            .into_iter()
            .map(|tx| TransactionRecord {
                id: Uuid::new_v4(),
                owner_id: subject,
                provider_transaction_id: tx.transaction_id,
                name: tx.name,
                amount: tx.amount,
                date: tx.date,
            })
            .collect();

        let inserted = self.transactions.insert_ignoring_duplicates(&records).await?;
        debug!(
            fetched = records.len(),
            inserted,
            start = %range.start,
            end = %range.end,
            "synced transactions",
        );
        info!(user_id = %subject, count = records.len(), "transaction sync complete");

        Ok(records)
    }
}
