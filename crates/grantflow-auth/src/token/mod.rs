//! Token minting.
//!
//! The grant engine asks a [`TokenIssuer`] for one access token and one
//! refresh token per successful exchange. Persistence of issued tokens, if
//! any, belongs to the issuer.

pub mod opaque;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::AuthResult;

pub use opaque::OpaqueTokenIssuer;

/// A freshly minted token and its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Opaque token value.
    pub token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

/// Mints access and refresh tokens.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Mints a new access token. Each call returns a fresh value.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be produced or recorded.
    async fn generate_access_token(&self) -> AuthResult<IssuedToken>;

    /// Mints a new refresh token. Each call returns a fresh value.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be produced or recorded.
    async fn generate_refresh_token(&self) -> AuthResult<IssuedToken>;
}

/// Generates `bytes` random bytes from the thread CSPRNG, base64url-encoded
/// without padding.
///
/// Used for authorization codes and opaque tokens alike.
#[must_use]
pub fn generate_opaque_value(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::Rng::fill(&mut rand::thread_rng(), buf.as_mut_slice());
    URL_SAFE_NO_PAD.encode(buf)
}
