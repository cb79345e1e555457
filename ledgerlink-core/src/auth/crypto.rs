use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::fmt;

use super::AuthError;

/// Password hashing helper wrapping Argon2id with its default parameters.
///
/// The defaults (19 MiB memory, 2 iterations) comfortably exceed the slow-hash
/// baseline of 8 bcrypt rounds. Verification goes through `verify_password`,
/// which compares in constant time.
pub struct PasswordCrypto {
    argon2: Argon2<'static>,
}

impl fmt::Debug for PasswordCrypto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCrypto").finish()
    }
}

impl Default for PasswordCrypto {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordCrypto {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hash a password with a fresh random salt. Returns a PHC string suitable
    /// for storage; the plaintext never leaves this call.
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AuthError::Hashing)?;
        Ok(hash.to_string())
    }

    /// Verify a candidate password against a stored PHC string.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::Hashing)?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
