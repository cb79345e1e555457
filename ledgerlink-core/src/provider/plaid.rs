use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use std::fmt;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

use super::{
    AggregatorClient, ExchangedCredential, LinkTokenPayload, ProviderError, ProviderTransaction,
};
use async_trait::async_trait;

/// Page size for `/transactions/get`; the provider caps a single response, so
/// larger histories are fetched by walking the offset.
const TRANSACTIONS_PAGE_SIZE: u32 = 500;

/// Connection settings for the Plaid-shaped aggregation API.
#[derive(Debug, Clone)]
pub struct PlaidConfig {
    /// Base URL, e.g. `https://sandbox.plaid.com`.
    pub base_url: String,
    pub client_id: String,
    pub secret: String,
    /// Display name shown inside the provider's linking UI.
    pub client_name: String,
    /// Upper bound for every upstream call; elapsed means `Unavailable`.
    pub timeout: Duration,
}

/// HTTP client for the aggregation provider.
///
/// Credentials travel as `PLAID-CLIENT-ID` / `PLAID-SECRET` headers on every
/// request; they are never part of a URL or an error message.
pub struct PlaidHttpClient {
    http: reqwest::Client,
    config: PlaidConfig,
}

impl fmt::Debug for PlaidHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaidHttpClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct PlaidErrorBody {
    #[serde(default)]
    error_type: String,
    #[serde(default)]
    error_code: String,
    #[serde(default)]
    error_message: String,
}

#[derive(Debug, Deserialize)]
struct TransactionsGetResponse {
    transactions: Vec<ProviderTransaction>,
    total_transactions: u64,
}

impl PlaidHttpClient {
    pub fn new(config: PlaidConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ProviderError> {
        let response = self
            .http
            .post(format!("{}{}", self.config.base_url, path))
            .header("PLAID-CLIENT-ID", &self.config.client_id)
            .header("PLAID-SECRET", &self.config.secret)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|err| ProviderError::Decode(err.to_string()));
        }

        match response.json::<PlaidErrorBody>().await {
            Ok(err) => {
                warn!(
                    error_type = %err.error_type,
                    error_code = %err.error_code,
                    %path,
                    "provider rejected request",
                );
                Err(map_error_body(err))
            }
            Err(_) => Err(ProviderError::Rejected {
                code: status.as_u16().to_string(),
                message: "provider returned a non-JSON error body".to_string(),
            }),
        }
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Unavailable("request timed out".to_string())
    } else {
        ProviderError::Unavailable(err.to_string())
    }
}

/// Map a provider error body onto the local taxonomy. A spent public token
/// comes back as `INVALID_PUBLIC_TOKEN`, which callers need to distinguish
/// from other rejections.
fn map_error_body(err: PlaidErrorBody) -> ProviderError {
    match err.error_code.as_str() {
        "INVALID_PUBLIC_TOKEN" | "PUBLIC_TOKEN_EXCHANGED" => ProviderError::TokenConsumed,
        _ => ProviderError::Rejected {
            code: err.error_code,
            message: err.error_message,
        },
    }
}

#[async_trait]
impl AggregatorClient for PlaidHttpClient {
    async fn create_link_token(&self, subject: Uuid) -> Result<LinkTokenPayload, ProviderError> {
        let body = json!({
            "user": { "client_user_id": subject.to_string() },
            "client_name": self.config.client_name,
            "products": ["auth", "transactions"],
            "country_codes": ["US"],
            "language": "en",
        });

        self.post("/link/token/create", &body).await
    }

    async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<ExchangedCredential, ProviderError> {
        let body = json!({ "public_token": public_token });

        self.post("/item/public_token/exchange", &body).await
    }

    async fn list_transactions(
        &self,
        access_token: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ProviderTransaction>, ProviderError> {
        let mut collected: Vec<ProviderTransaction> = Vec::new();

        loop {
            let body = json!({
                "access_token": access_token,
                "start_date": start.to_string(),
                "end_date": end.to_string(),
                "options": {
                    "count": TRANSACTIONS_PAGE_SIZE,
                    "offset": collected.len(),
                },
            });

            let page: TransactionsGetResponse = self.post("/transactions/get", &body).await?;
            let total = page.total_transactions as usize;
            let page_len = page.transactions.len();
            collected.extend(page.transactions);

            if collected.len() >= total || page_len == 0 {
                break;
            }
        }

        Ok(collected)
    }
}
