use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use ledgerlink_core::{AuthError, IngestError, LinkError, ProviderError};

pub type AppResult<T> = Result<T, AppError>;

/// Request-scoped error: an HTTP status plus a message rendered as
/// `{"error": <message>}`. Every domain error maps onto this deterministically;
/// nothing is retried.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(_) => Self::bad_request(err.to_string()),
            AuthError::DuplicateUser => Self::conflict(err.to_string()),
            AuthError::UserNotFound => Self::not_found(err.to_string()),
            AuthError::InvalidCredentials => Self::unauthorized(err.to_string()),
            AuthError::MissingToken => Self::forbidden(err.to_string()),
            AuthError::MalformedToken => Self::unauthorized(err.to_string()),
            AuthError::InvalidSignature | AuthError::Expired => Self::internal(err.to_string()),
            AuthError::Hashing | AuthError::TokenGeneration => {
                Self::internal("internal authentication error")
            }
            AuthError::Storage(_) => Self::internal("storage error"),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        // Provider detail is safe to surface; it carries no internal secrets.
        Self::internal(err.to_string())
    }
}

impl From<LinkError> for AppError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::Provider(provider) => provider.into(),
            LinkError::Storage(_) => Self::internal("storage error"),
        }
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::NoLinkedAccount => Self::internal(err.to_string()),
            IngestError::Provider(provider) => provider.into(),
            IngestError::Storage(_) => Self::internal("storage error"),
        }
    }
}
