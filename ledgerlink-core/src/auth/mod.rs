//! Session authentication: password verification and stateless signed tokens.
//!
//! Sessions are bearer JWTs signed with a server-held secret. There is no
//! server-side session table and no revocation list; a token is invalidated only
//! by its expiry, 86400 seconds after issuance. That non-revocability is an
//! accepted tradeoff for avoiding a shared mutable session store.

pub mod crypto;
pub mod service;
pub mod token;

pub use crypto::PasswordCrypto;
pub use service::AuthService;
pub use token::{Claims, SESSION_LIFETIME_SECS, SessionKeys, parse_bearer_header};

/// Errors produced by registration, login, and token verification.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("username already taken")]
    DuplicateUser,

    #[error("user not found")]
    UserNotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("no token provided")]
    MissingToken,

    #[error("invalid token format")]
    MalformedToken,

    #[error("failed to authenticate token")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("password hashing failed")]
    Hashing,

    #[error("token generation failed")]
    TokenGeneration,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
