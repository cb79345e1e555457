//! Ledgerlink server binary: load configuration, run migrations, wire the
//! provider client and Postgres repositories, and serve the API.

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ledgerlink_core::provider::{PlaidConfig, PlaidHttpClient};
use ledgerlink_server::{
    create_app,
    infra::{app_state::AppState, config::Config},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;

    ledgerlink_core::MIGRATOR
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    let provider = Arc::new(PlaidHttpClient::new(PlaidConfig {
        base_url: config.provider_base_url.clone(),
        client_id: config.provider_client_id.clone(),
        secret: config.provider_secret.clone(),
        client_name: config.provider_client_name.clone(),
        timeout: config.provider_timeout,
    })?);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let state = AppState::build(config, pool, provider);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
