#![allow(dead_code)]

//! Shared test wiring: in-memory repositories, a scripted provider fake, and
//! request/response helpers for exercising the real router end to end.

use std::collections::{HashMap, HashSet};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use chrono::{NaiveDate, Utc};
use serde::{Serialize, de::DeserializeOwned};
use tower::ServiceExt;
use uuid::Uuid;

use ledgerlink_core::{
    AggregatorClient, AuthService, IngestService, LinkService, ProviderError, SessionKeys,
    linking::{AccessCredential, AccessCredentialRepository},
    provider::{ExchangedCredential, LinkTokenPayload, ProviderTransaction},
    transactions::{TransactionRecord, TransactionRepository},
    users::{NewUser, UserIdentity, UserRepository},
};
use ledgerlink_server::{
    create_app,
    infra::{app_state::AppState, config::Config},
};

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<UserIdentity>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn insert(&self, user: NewUser) -> Result<UserIdentity> {
        let row = UserIdentity {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            email: user.email,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserIdentity>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryCredentials {
    rows: Mutex<HashMap<Uuid, AccessCredential>>,
}

#[async_trait]
impl AccessCredentialRepository for InMemoryCredentials {
    async fn upsert(&self, credential: &AccessCredential) -> Result<()> {
        self.rows
            .lock()
            .unwrap()
            .insert(credential.user_id, credential.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<AccessCredential>> {
        Ok(self.rows.lock().unwrap().get(&user_id).cloned())
    }
}

/// Mirrors the Postgres unique index on (owner, provider transaction id).
#[derive(Default)]
pub struct InMemoryTransactions {
    rows: Mutex<Vec<TransactionRecord>>,
}

#[async_trait]
impl TransactionRepository for InMemoryTransactions {
    async fn insert_ignoring_duplicates(&self, records: &[TransactionRecord]) -> Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut inserted = 0;
        for record in records {
            let exists = rows.iter().any(|r| {
                r.owner_id == record.owner_id
                    && r.provider_transaction_id == record.provider_transaction_id
            });
            if !exists {
                rows.push(record.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<TransactionRecord>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect())
    }
}

/// Scripted provider: counts calls, enforces single-use public tokens, and
/// serves whatever transactions the test loaded.
#[derive(Default)]
pub struct FakeAggregator {
    pub link_calls: AtomicUsize,
    pub exchange_calls: AtomicUsize,
    pub transaction_calls: AtomicUsize,
    consumed: Mutex<HashSet<String>>,
    scripted: Mutex<Vec<ProviderTransaction>>,
}

impl FakeAggregator {
    pub fn script_transactions(&self, transactions: Vec<ProviderTransaction>) {
        *self.scripted.lock().unwrap() = transactions;
    }
}

#[async_trait]
impl AggregatorClient for FakeAggregator {
    async fn create_link_token(&self, subject: Uuid) -> Result<LinkTokenPayload, ProviderError> {
        self.link_calls.fetch_add(1, Ordering::SeqCst);
        Ok(LinkTokenPayload {
            link_token: format!("link-sandbox-{subject}"),
            expiration: None,
            request_id: Some("req-test".to_string()),
        })
    }

    async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<ExchangedCredential, ProviderError> {
        let n = self.exchange_calls.fetch_add(1, Ordering::SeqCst);

        let mut consumed = self.consumed.lock().unwrap();
        if !consumed.insert(public_token.to_string()) {
            return Err(ProviderError::TokenConsumed);
        }

        Ok(ExchangedCredential {
            access_token: format!("access-test-{n}"),
            item_id: format!("item-test-{n}"),
        })
    }

    async fn list_transactions(
        &self,
        _access_token: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ProviderTransaction>, ProviderError> {
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .scripted
            .lock()
            .unwrap()
            .iter()
            .filter(|tx| tx.date >= start && tx.date <= end)
            .cloned()
            .collect())
    }
}

pub struct TestApp {
    pub app: Router,
    pub users: Arc<InMemoryUsers>,
    pub provider: Arc<FakeAggregator>,
    pub transactions: Arc<InMemoryTransactions>,
}

pub fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: "postgres://unused".to_string(),
        session_secret: "integration-test-secret".to_string(),
        provider_base_url: "http://127.0.0.1:0".to_string(),
        provider_client_id: "test-client".to_string(),
        provider_secret: "test-secret".to_string(),
        provider_client_name: "Ledgerlink Test".to_string(),
        provider_timeout: Duration::from_secs(1),
        sync_lookback_days: 90,
        cors_allowed_origins: vec!["http://localhost:3000".to_string()],
    }
}

/// Build the real app over in-memory repositories and the scripted provider.
pub fn setup_test_app() -> TestApp {
    let users = Arc::new(InMemoryUsers::default());
    let credentials = Arc::new(InMemoryCredentials::default());
    let transactions = Arc::new(InMemoryTransactions::default());
    let provider = Arc::new(FakeAggregator::default());
    let config = Arc::new(test_config());

    let auth = Arc::new(AuthService::new(
        users.clone(),
        SessionKeys::new(&config.session_secret),
    ));
    let linking = Arc::new(LinkService::new(provider.clone(), credentials.clone()));
    let ingest = Arc::new(IngestService::new(
        provider.clone(),
        credentials,
        transactions.clone(),
        config.sync_lookback_days,
    ));

    let state = AppState::new(config, auth, linking, ingest);
    TestApp {
        app: create_app(state),
        users,
        provider,
        transactions,
    }
}

pub fn post_json<T: Serialize>(uri: &str, token: Option<&str>, body: &T) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn body_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register and log in a fresh user, returning their session token.
pub async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/register",
            None,
            &serde_json::json!({
                "username": username,
                "password": password,
                "email": format!("{username}@example.com"),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/login",
            None,
            &serde_json::json!({ "username": username, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = body_json(response).await;
    assert_eq!(body["auth"], true);
    body["token"].as_str().unwrap().to_string()
}
