//! Client authentication at the token endpoint.
//!
//! The grant engine asks a [`ClientAuthenticator`] whether the presented
//! secret and redirect URI belong to the resolved client. The answer is a
//! plain boolean; the engine turns `false` into
//! [`AuthError::ClientAuthenticationFailed`](crate::error::AuthError).

use async_trait::async_trait;

use crate::AuthResult;
use crate::error::AuthError;
use crate::secret::verify_client_secret;
use crate::types::Client;

/// Verifies client credentials. Implementations must be side-effect free.
#[async_trait]
pub trait ClientAuthenticator: Send + Sync {
    /// Returns `true` if `client_secret` and `redirect_uri` are valid for `client`.
    ///
    /// # Errors
    ///
    /// Returns an error only if verification itself could not run
    /// (e.g. a corrupt stored hash).
    async fn authenticate(
        &self,
        client: &Client,
        client_secret: &str,
        redirect_uri: &str,
    ) -> AuthResult<bool>;
}

/// Authenticates against the client's stored Argon2 secret hash and its
/// registered redirect URIs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretClientAuthenticator;

impl SecretClientAuthenticator {
    /// Creates a new authenticator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClientAuthenticator for SecretClientAuthenticator {
    async fn authenticate(
        &self,
        client: &Client,
        client_secret: &str,
        redirect_uri: &str,
    ) -> AuthResult<bool> {
        if !client.is_redirect_uri_allowed(redirect_uri) {
            tracing::debug!(
                client_id = %client.client_id,
                "Redirect URI is not registered for client"
            );
            return Ok(false);
        }

        let Some(ref hash) = client.client_secret else {
            tracing::debug!(client_id = %client.client_id, "Client has no secret registered");
            return Ok(false);
        };

        // Argon2 verification is CPU-bound; keep it off the async workers.
        let secret = client_secret.to_owned();
        let hash = hash.clone();
        tokio::task::spawn_blocking(move || verify_client_secret(&secret, &hash))
            .await
            .map_err(|e| AuthError::internal(format!("Secret verification task failed: {}", e)))?
            .map_err(|e| AuthError::internal(format!("Stored client secret hash is invalid: {}", e)))
    }
}
