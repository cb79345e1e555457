use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use ledgerlink_core::AuthError;

use crate::{errors::AppError, infra::app_state::AppState};

/// The authenticated user id, inserted into request extensions by
/// [`auth_middleware`] and read by every protected handler.
#[derive(Debug, Clone, Copy)]
pub struct Subject(pub Uuid);

/// Gate for protected routes: verifies the `Authorization: Bearer <token>`
/// header and short-circuits before any storage or provider access on failure.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // A header that is present but not valid UTF-8 is malformed, not missing.
    let header = match request.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedToken)?),
        None => None,
    };

    let subject = state.auth.verify_header(header)?;

    request.extensions_mut().insert(Subject(subject));
    Ok(next.run(request).await)
}
