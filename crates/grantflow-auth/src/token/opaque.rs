//! Opaque bearer token issuer.

use async_trait::async_trait;

use crate::AuthResult;
use crate::config::GrantConfig;
use crate::token::{IssuedToken, TokenIssuer, generate_opaque_value};

/// Issues random opaque tokens with lifetimes taken from [`GrantConfig`].
///
/// Tokens are not recorded anywhere; resource servers validating them need
/// an issuer that also persists what it mints.
#[derive(Debug, Clone)]
pub struct OpaqueTokenIssuer {
    token_bytes: usize,
    access_token_lifetime: u64,
    refresh_token_lifetime: u64,
}

impl OpaqueTokenIssuer {
    /// Creates an issuer from the grant configuration.
    #[must_use]
    pub fn new(config: &GrantConfig) -> Self {
        Self {
            token_bytes: config.token_bytes,
            access_token_lifetime: config.access_token_lifetime.as_secs(),
            refresh_token_lifetime: config.refresh_token_lifetime.as_secs(),
        }
    }
}

impl Default for OpaqueTokenIssuer {
    fn default() -> Self {
        Self::new(&GrantConfig::default())
    }
}

#[async_trait]
impl TokenIssuer for OpaqueTokenIssuer {
    async fn generate_access_token(&self) -> AuthResult<IssuedToken> {
        Ok(IssuedToken {
            token: generate_opaque_value(self.token_bytes),
            expires_in: self.access_token_lifetime,
        })
    }

    async fn generate_refresh_token(&self) -> AuthResult<IssuedToken> {
        Ok(IssuedToken {
            token: generate_opaque_value(self.token_bytes),
            expires_in: self.refresh_token_lifetime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_lifetimes_follow_config() {
        let config = GrantConfig {
            access_token_lifetime: Duration::from_secs(900),
            refresh_token_lifetime: Duration::from_secs(86_400),
            ..GrantConfig::default()
        };
        let issuer = OpaqueTokenIssuer::new(&config);

        let access = issuer.generate_access_token().await.unwrap();
        let refresh = issuer.generate_refresh_token().await.unwrap();

        assert_eq!(access.expires_in, 900);
        assert_eq!(refresh.expires_in, 86_400);
        assert_ne!(access.token, refresh.token);
    }

    #[tokio::test]
    async fn test_fresh_value_each_call() {
        let issuer = OpaqueTokenIssuer::default();
        let first = issuer.generate_access_token().await.unwrap();
        let second = issuer.generate_access_token().await.unwrap();
        assert_ne!(first.token, second.token);
    }
}
