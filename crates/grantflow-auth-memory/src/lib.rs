//! In-memory collaborator stores for the grantflow authorization code grant.
//!
//! Every store is backed by a [`dashmap::DashMap`], so concurrent callers on
//! different keys never contend and operations on one key are serialized by
//! the owning shard. That is what makes [`InMemoryCodeStore::consume`]
//! single-use under concurrency.
//!
//! State lives only as long as the process. Stores are meant for tests,
//! demos and single-node deployments.
//!
//! Nothing is evicted on its own: consumed codes and the contexts of
//! redeemed codes stay in memory until they expire *and*
//! [`MemoryStores::cleanup_expired`] runs. Long-lived embedders must call it
//! periodically, e.g. from a `tokio::time::interval` task.
//!
//! # Example
//!
//! ```ignore
//! use grantflow_auth::{GrantConfig, OpaqueTokenIssuer, SecretClientAuthenticator};
//! use grantflow_auth_memory::MemoryStores;
//!
//! let config = GrantConfig::default();
//! let stores = MemoryStores::new(&config);
//! stores.clients.register(client)?;
//!
//! let grant = stores.into_grant(
//!     Arc::new(SecretClientAuthenticator::new()),
//!     Arc::new(OpaqueTokenIssuer::new(&config)),
//!     config,
//! );
//! ```

pub mod client;
pub mod code;
pub mod context;

use std::sync::Arc;

use grantflow_auth::{AuthorizationCodeGrant, ClientAuthenticator, GrantConfig, TokenIssuer};

pub use client::InMemoryClientRegistry;
pub use code::InMemoryCodeStore;
pub use context::InMemoryContextStore;

/// The three in-memory stores, sharing one configuration.
#[derive(Debug, Clone)]
pub struct MemoryStores {
    pub clients: Arc<InMemoryClientRegistry>,
    pub codes: Arc<InMemoryCodeStore>,
    pub contexts: Arc<InMemoryContextStore>,
}

impl MemoryStores {
    /// Creates empty stores using the lifetimes and code size from `config`.
    #[must_use]
    pub fn new(config: &GrantConfig) -> Self {
        Self {
            clients: Arc::new(InMemoryClientRegistry::new()),
            codes: Arc::new(InMemoryCodeStore::new(config)),
            contexts: Arc::new(InMemoryContextStore::new(config)),
        }
    }

    /// Wires the stores into a grant engine.
    #[must_use]
    pub fn into_grant(
        self,
        authenticator: Arc<dyn ClientAuthenticator>,
        token_issuer: Arc<dyn TokenIssuer>,
        config: GrantConfig,
    ) -> AuthorizationCodeGrant {
        AuthorizationCodeGrant::new(
            self.clients,
            authenticator,
            self.codes,
            token_issuer,
            self.contexts,
        )
        .with_config(config)
    }

    /// Drops expired codes and contexts. Returns the number of entries removed.
    ///
    /// Not scheduled by the stores; call it periodically to bound memory.
    ///
    /// ```ignore
    /// let stores = stores.clone();
    /// tokio::spawn(async move {
    ///     let mut tick = tokio::time::interval(std::time::Duration::from_secs(60));
    ///     loop {
    ///         tick.tick().await;
    ///         stores.cleanup_expired();
    ///     }
    /// });
    /// ```
    pub fn cleanup_expired(&self) -> usize {
        let removed = self.codes.cleanup_expired() + self.contexts.cleanup_expired();
        if removed > 0 {
            tracing::debug!(removed, "Purged expired grant state");
        }
        removed
    }
}
