use std::fmt;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{AuthError, PasswordCrypto, SessionKeys, parse_bearer_header};
use crate::users::{DuplicateUsername, NewUser, UserIdentity, UserRepository};

/// Session authenticator: registration, login, and token verification.
///
/// Gates every other component: a request only reaches the broker, exchange, or
/// ingestor after [`AuthService::verify_header`] yields a subject id.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    crypto: PasswordCrypto,
    keys: SessionKeys,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("user_repo_refs", &Arc::strong_count(&self.users))
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, keys: SessionKeys) -> Self {
        Self {
            users,
            crypto: PasswordCrypto::new(),
            keys,
        }
    }

    /// Register a new user. The password is hashed before it touches storage;
    /// the plaintext is never persisted or logged.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<UserIdentity, AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::InvalidInput("username must not be empty"));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidInput("password must not be empty"));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AuthError::DuplicateUser);
        }

        let password_hash = self.crypto.hash_password(password)?;
        let user = self
            .users
            .insert(NewUser {
                username: username.to_string(),
                password_hash,
                email: email.to_string(),
            })
            .await
            .map_err(|err| {
                // A concurrent registration can win between the lookup above
                // and this insert; the store reports it as a duplicate.
                if err.is::<DuplicateUsername>() {
                    AuthError::DuplicateUser
                } else {
                    AuthError::Storage(err)
                }
            })?;

        info!(user_id = %user.id, username = %user.username, "registered user");
        Ok(user)
    }

    /// Authenticate a username/password pair and issue a session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self.crypto.verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.keys.issue(user.id)?;
        info!(user_id = %user.id, "issued session token");
        Ok(token)
    }

    /// Verify an `Authorization` header and return the authenticated subject.
    /// Pure check with no storage access.
    pub fn verify_header(&self, header: Option<&str>) -> Result<Uuid, AuthError> {
        let token = parse_bearer_header(header)?;
        self.keys.verify(token)
    }
}
