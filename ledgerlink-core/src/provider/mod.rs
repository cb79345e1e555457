//! The aggregation provider boundary.
//!
//! Everything the rest of the crate knows about the external financial-data
//! provider goes through [`AggregatorClient`]: a link-token request, a single
//! public-token exchange, and a transaction listing. The real implementation is
//! [`PlaidHttpClient`]; tests substitute fakes or mocks.

mod plaid;

pub use plaid::{PlaidConfig, PlaidHttpClient};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Errors surfaced from the provider boundary. Messages carry the provider's
/// own detail but never internal secret material.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport failure or timeout; the provider could not be reached.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider reached a decision and said no.
    #[error("provider rejected request: {message}")]
    Rejected { code: String, message: String },

    /// The public token was already exchanged (or is otherwise spent).
    #[error("public token already consumed")]
    TokenConsumed,

    /// The provider answered with a body this client cannot interpret.
    #[error("unexpected provider response: {0}")]
    Decode(String),
}

/// Link-token payload returned by the provider, passed through to the client
/// unchanged. The token is short-lived and never persisted server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkTokenPayload {
    pub link_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Result of a successful public-token exchange.
#[derive(Clone, Deserialize)]
pub struct ExchangedCredential {
    pub access_token: String,
    pub item_id: String,
}

// The access token is an opaque secret; keep it out of Debug output and logs.
impl fmt::Debug for ExchangedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangedCredential")
            .field("access_token", &"<redacted>")
            .field("item_id", &self.item_id)
            .finish()
    }
}

/// One transaction as reported by the provider. `transaction_id` is the stable
/// identifier used for idempotent ingestion.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderTransaction {
    pub transaction_id: String,
    pub name: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Narrow remote-procedure interface to the aggregation provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AggregatorClient: Send + Sync {
    /// Request a fresh, short-lived link token scoped to `subject`.
    async fn create_link_token(&self, subject: Uuid) -> Result<LinkTokenPayload, ProviderError>;

    /// Exchange a single-use public token for a durable access credential.
    async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<ExchangedCredential, ProviderError>;

    /// List transactions for `access_token` within the inclusive date range.
    async fn list_transactions(
        &self,
        access_token: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ProviderTransaction>, ProviderError>;
}
