use anyhow::{Context, Result};
use std::{env, time::Duration};

/// Server configuration loaded once at startup from environment variables
/// (a `.env` file is honored when present).
#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Database settings
    pub database_url: String,

    // Session token signing secret; required, never logged
    pub session_secret: String,

    // Aggregation provider settings
    pub provider_base_url: String,
    pub provider_client_id: String,
    pub provider_secret: String,
    pub provider_client_name: String,
    /// Upper bound on each provider call; an elapsed timeout surfaces as
    /// "provider unavailable".
    pub provider_timeout: Duration,

    /// Default transaction sync window: the trailing N days ending today,
    /// used whenever a sync request names no explicit date range.
    pub sync_lookback_days: u32,

    // CORS settings
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse()
                .unwrap_or(5001),

            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,

            session_secret: env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?,

            provider_base_url: env::var("PLAID_BASE_URL")
                .unwrap_or_else(|_| "https://sandbox.plaid.com".to_string()),
            provider_client_id: env::var("PLAID_CLIENT_ID")
                .context("PLAID_CLIENT_ID must be set")?,
            provider_secret: env::var("PLAID_SECRET").context("PLAID_SECRET must be set")?,
            provider_client_name: env::var("PLAID_CLIENT_NAME")
                .unwrap_or_else(|_| "Ledgerlink".to_string()),
            provider_timeout: Duration::from_secs(
                env::var("PROVIDER_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            ),

            sync_lookback_days: env::var("SYNC_LOOKBACK_DAYS")
                .unwrap_or_else(|_| "90".to_string())
                .parse()
                .unwrap_or(90),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://localhost:3002".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
        })
    }
}
