//! # Ledgerlink Core
//!
//! Core library for the Ledgerlink backend, covering the authenticated-session and
//! token-exchange lifecycle behind a bank-account linking service.
//!
//! ## Overview
//!
//! - [`users`]: user identity records and the credential store
//! - [`auth`]: password hashing plus stateless signed session tokens (issue/verify)
//! - [`provider`]: the narrow interface to the external aggregation provider, with a
//!   real HTTP client implementation
//! - [`linking`]: link-token brokering and public-token exchange, persisting the
//!   resulting access credential per user
//! - [`transactions`]: transaction ingestion with idempotent persistence
//!
//! Sessions are stateless bearer tokens: there is no server-side session table, which
//! trades revocability for simplicity. Every component takes its collaborators
//! (repositories, provider client, signing keys) at construction so tests can
//! substitute fakes.

pub mod auth;
pub mod linking;
pub mod provider;
pub mod transactions;
pub mod users;

/// Embedded database migrations, applied by the server at startup.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use auth::{AuthError, AuthService, SessionKeys};
pub use linking::{AccessCredential, LinkError, LinkService};
pub use provider::{AggregatorClient, ProviderError};
pub use transactions::{DateRange, IngestError, IngestService, TransactionRecord};
pub use users::UserIdentity;
