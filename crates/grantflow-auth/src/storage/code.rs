//! Authorization code store trait.
//!
//! # Security Considerations
//!
//! - Never log authorization codes
//! - `consume` must be atomic: of any number of concurrent calls for one
//!   code, at most one may succeed
//! - Expiry is enforced here, not in the engine

use async_trait::async_trait;

use crate::AuthResult;
use crate::oauth::authorize::ValidatedAuthorizationRequest;

/// Issuance and single-use consumption of authorization codes.
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Issues a fresh, unguessable code bound to the request's client id,
    /// redirect URI and scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the code cannot be stored.
    async fn issue(&self, request: &ValidatedAuthorizationRequest) -> AuthResult<String>;

    /// Consumes a code, moving it from issued to consumed.
    ///
    /// # Errors
    ///
    /// Returns `AuthorizationCodeRejected` if the code is unknown, expired
    /// or already consumed, or a storage error if the backend fails.
    ///
    /// # Atomicity
    ///
    /// A SQL backend would use a conditional update:
    ///
    /// ```sql
    /// UPDATE authorization_codes
    /// SET consumed_at = NOW()
    /// WHERE code = $1 AND consumed_at IS NULL AND expires_at > NOW()
    /// ```
    async fn consume(&self, code: &str) -> AuthResult<()>;
}
