//! # Ledgerlink Server
//!
//! HTTP surface for the Ledgerlink backend.
//!
//! The server exposes a small JSON API: register and login (public), then link
//! token creation, public-token exchange, and transaction sync behind a
//! stateless bearer-session gate. Domain logic lives in `ledgerlink-core`;
//! this crate only wires configuration, state, routing, and error mapping.

pub mod errors;
pub mod handlers;
pub mod infra;
pub mod middleware;
pub mod routes;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::infra::app_state::AppState;

/// Build the full application router with tracing and CORS layers applied.
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .nest("/api", routes::create_api_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
