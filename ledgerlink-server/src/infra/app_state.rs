use std::{fmt, sync::Arc};

use sqlx::PgPool;

use ledgerlink_core::{
    AggregatorClient, AuthService, IngestService, LinkService, SessionKeys,
    linking::PostgresAccessCredentialRepository, transactions::PostgresTransactionRepository,
    users::PostgresUserRepository,
};

use crate::infra::config::Config;

/// Shared per-request state. All services are immutable once constructed and
/// take their collaborators by injection, so tests can wire fakes in.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<AuthService>,
    pub linking: Arc<LinkService>,
    pub ingest: Arc<IngestService>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        auth: Arc<AuthService>,
        linking: Arc<LinkService>,
        ingest: Arc<IngestService>,
    ) -> Self {
        Self {
            config,
            auth,
            linking,
            ingest,
        }
    }

    /// Wire the production state: Postgres repositories behind the domain
    /// services, with the given provider client.
    pub fn build(config: Config, pool: PgPool, provider: Arc<dyn AggregatorClient>) -> Self {
        let users = Arc::new(PostgresUserRepository::new(pool.clone()));
        let credentials = Arc::new(PostgresAccessCredentialRepository::new(pool.clone()));
        let transactions = Arc::new(PostgresTransactionRepository::new(pool));

        let auth = Arc::new(AuthService::new(
            users,
            SessionKeys::new(&config.session_secret),
        ));
        let linking = Arc::new(LinkService::new(provider.clone(), credentials.clone()));
        let ingest = Arc::new(IngestService::new(
            provider,
            credentials,
            transactions,
            config.sync_lookback_days,
        ));

        Self::new(Arc::new(config), auth, linking, ingest)
    }
}
