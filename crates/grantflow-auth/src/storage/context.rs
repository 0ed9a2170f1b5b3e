//! Grant context store trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::oauth::authorize::ValidatedAuthorizationRequest;
use crate::oauth::context::Context;
use crate::oauth::token::ValidatedTokenRequest;

/// Persistence of the state linking an authorization code to its request.
///
/// Implementations must give read-after-write visibility: a context saved
/// during the authorization phase is visible to the token phase that
/// follows, across process boundaries.
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Saves a context for the request, recording `property` (name, value)
    /// alongside the request-derived fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be stored.
    async fn save(
        &self,
        request: &ValidatedAuthorizationRequest,
        property: (&str, &str),
    ) -> AuthResult<Context>;

    /// Resolves the context a token request refers to.
    ///
    /// Returns `None` if no context exists for the request's code or the
    /// context has expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn retrieve(&self, request: &ValidatedTokenRequest) -> AuthResult<Option<Context>>;
}
