use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::AuthError;

/// Session lifetime in seconds. Tokens expire 86400 seconds after issuance and
/// cannot be revoked earlier.
pub const SESSION_LIFETIME_SECS: i64 = 86_400;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's id.
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signing key pair for session tokens, built once from the server-held
/// secret and injected wherever tokens are issued or verified.
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys").finish_non_exhaustive()
    }
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a signed session token for `subject`, valid for
    /// [`SESSION_LIFETIME_SECS`] from now.
    pub fn issue(&self, subject: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(SESSION_LIFETIME_SECS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| AuthError::TokenGeneration)
    }

    /// Verify a token and return its subject. Pure check: no storage access,
    /// no side effects.
    pub fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Ok(data.claims.sub),
            Err(err) => match err.kind() {
                ErrorKind::ExpiredSignature => Err(AuthError::Expired),
                _ => Err(AuthError::InvalidSignature),
            },
        }
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The header must be exactly two space-separated parts with the first part the
/// literal `Bearer`. A missing header is [`AuthError::MissingToken`]; any other
/// shape is [`AuthError::MalformedToken`].
pub fn parse_bearer_header(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;

    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> SessionKeys {
        SessionKeys::new("test-session-secret")
    }

    #[test]
    fn issue_then_verify_returns_subject() {
        let keys = keys();
        let subject = Uuid::new_v4();

        let token = keys.issue(subject).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), subject);
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let keys = keys();
        let token = keys.issue(Uuid::new_v4()).unwrap();

        // Flip the last character of the signature segment
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(matches!(
            keys.verify(&tampered),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = SessionKeys::new("other-secret")
            .issue(Uuid::new_v4())
            .unwrap();

        assert!(matches!(
            keys().verify(&token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys();
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: (now - Duration::seconds(100_000)).timestamp(),
            exp: (now - Duration::seconds(10_000)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-session-secret"),
        )
        .unwrap();

        assert!(matches!(keys.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn bearer_header_parsing() {
        assert!(matches!(
            parse_bearer_header(None),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            parse_bearer_header(Some("abc")),
            Err(AuthError::MalformedToken)
        ));
        assert!(matches!(
            parse_bearer_header(Some("Basic abc")),
            Err(AuthError::MalformedToken)
        ));
        assert!(matches!(
            parse_bearer_header(Some("Bearer abc def")),
            Err(AuthError::MalformedToken)
        ));
        assert!(matches!(
            parse_bearer_header(Some("Bearer ")),
            Err(AuthError::MalformedToken)
        ));
        assert_eq!(parse_bearer_header(Some("Bearer abc")).unwrap(), "abc");
    }
}
