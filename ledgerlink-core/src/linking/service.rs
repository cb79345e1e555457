use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{AccessCredential, AccessCredentialRepository, LinkError};
use crate::provider::{AggregatorClient, LinkTokenPayload};

/// Link-token broker and exchange coordinator.
///
/// Both operations assume the caller already authenticated the subject; the
/// service itself performs no session checks.
pub struct LinkService {
    provider: Arc<dyn AggregatorClient>,
    credentials: Arc<dyn AccessCredentialRepository>,
}

impl fmt::Debug for LinkService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkService").finish_non_exhaustive()
    }
}

impl LinkService {
    pub fn new(
        provider: Arc<dyn AggregatorClient>,
        credentials: Arc<dyn AccessCredentialRepository>,
    ) -> Self {
        Self {
            provider,
            credentials,
        }
    }

    /// Request a fresh link token for `subject`. The token is short-lived,
    /// single-purpose, and never persisted; the provider payload passes through
    /// unchanged.
    pub async fn create_link_token(&self, subject: Uuid) -> Result<LinkTokenPayload, LinkError> {
        let payload = self.provider.create_link_token(subject).await?;
        info!(user_id = %subject, "created link token");
        Ok(payload)
    }

    /// Exchange a single-use public token and persist the resulting credential
    /// keyed by `subject`, replacing any prior credential for that user.
    ///
    /// A failed exchange writes nothing; a repeat submission of the same public
    /// token surfaces the provider's already-consumed error untouched.
    pub async fn exchange_public_token(
        &self,
        subject: Uuid,
        public_token: &str,
    ) -> Result<AccessCredential, LinkError> {
        let exchanged = self.provider.exchange_public_token(public_token).await?;

        let credential = AccessCredential {
            user_id: subject,
            access_token: exchanged.access_token,
            item_id: exchanged.item_id,
            linked_at: Utc::now(),
        };

        // Durable before we answer: a fetch issued right after this response
        // must find the credential.
        self.credentials.upsert(&credential).await?;
        info!(user_id = %subject, item_id = %credential.item_id, "stored access credential");

        Ok(credential)
    }
}
