use axum::{
    Router, middleware,
    routing::post,
};

use crate::{
    handlers::{auth_handlers, link_handlers},
    infra::app_state::AppState,
    middleware::auth::auth_middleware,
};

/// All `/api` routes. Registration and login are public; everything else sits
/// behind the session gate.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        // Public authentication endpoints
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        // Merge protected routes
        .merge(create_protected_routes(state))
}

/// Routes that require a valid session token.
fn create_protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/create_link_token",
            post(link_handlers::create_link_token),
        )
        .route(
            "/exchange_public_token",
            post(link_handlers::exchange_public_token),
        )
        .route("/transactions", post(link_handlers::sync_transactions))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}
