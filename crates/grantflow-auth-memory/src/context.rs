//! In-memory grant context store.

use async_trait::async_trait;
use dashmap::DashMap;
use grantflow_auth::oauth::{Context, ValidatedAuthorizationRequest, ValidatedTokenRequest};
use grantflow_auth::storage::ContextStore;
use grantflow_auth::{AuthError, AuthResult, GrantConfig};
use time::Duration;

/// Contexts keyed by the authorization code recorded in them.
#[derive(Debug)]
pub struct InMemoryContextStore {
    contexts: DashMap<String, Context>,
    lifetime: Duration,
}

impl InMemoryContextStore {
    /// Creates an empty store using the context lifetime from `config`.
    #[must_use]
    pub fn new(config: &GrantConfig) -> Self {
        Self {
            contexts: DashMap::new(),
            lifetime: config.context_lifetime(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Removes expired contexts. Returns how many were removed.
    ///
    /// Expired entries are otherwise only dropped lazily when a token
    /// request presents their code.
    pub fn cleanup_expired(&self) -> usize {
        let before = self.contexts.len();
        self.contexts.retain(|_, context| !context.is_expired());
        before.saturating_sub(self.contexts.len())
    }
}

impl Default for InMemoryContextStore {
    fn default() -> Self {
        Self::new(&GrantConfig::default())
    }
}

#[async_trait]
impl ContextStore for InMemoryContextStore {
    async fn save(
        &self,
        request: &ValidatedAuthorizationRequest,
        property: (&str, &str),
    ) -> AuthResult<Context> {
        let context = Context::from_request(request, property, self.lifetime)?;
        let code = context.authorization_code().ok_or_else(|| {
            AuthError::storage("Context has no authorization code to be indexed by")
        })?;

        self.contexts.insert(code.to_string(), context.clone());
        Ok(context)
    }

    async fn retrieve(&self, request: &ValidatedTokenRequest) -> AuthResult<Option<Context>> {
        let Some(context) = self
            .contexts
            .get(&request.code)
            .map(|entry| entry.value().clone())
        else {
            return Ok(None);
        };

        if context.is_expired() {
            self.contexts
                .remove_if(&request.code, |_, context| context.is_expired());
            return Ok(None);
        }
        Ok(Some(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grantflow_auth::oauth::AUTHORIZATION_CODE_PROPERTY;
    use grantflow_auth::{AuthorizationRequest, TokenRequest};

    fn authorization() -> ValidatedAuthorizationRequest {
        AuthorizationRequest::new("c1")
            .with_redirect_uri("https://app/cb")
            .with_scope("read")
            .with_state("xyz")
            .validate()
            .unwrap()
    }

    fn token(code: &str) -> ValidatedTokenRequest {
        TokenRequest::new("c1", "s1", "https://app/cb", code)
            .validate()
            .unwrap()
    }

    #[tokio::test]
    async fn test_save_then_retrieve() {
        let store = InMemoryContextStore::default();
        let saved = store
            .save(&authorization(), (AUTHORIZATION_CODE_PROPERTY, "code-1"))
            .await
            .unwrap();

        assert_eq!(saved.authorization_code(), Some("code-1"));
        assert_eq!(saved.scope.as_deref(), Some("read"));

        let found = store.retrieve(&token("code-1")).await.unwrap().unwrap();
        assert_eq!(found, saved);
    }

    #[tokio::test]
    async fn test_retrieve_unknown_code() {
        let store = InMemoryContextStore::default();
        assert!(store.retrieve(&token("missing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_without_code_property() {
        let store = InMemoryContextStore::default();
        let err = store
            .save(&authorization(), ("something_else", "v"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Storage { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_expired_context_is_not_returned() {
        let store = InMemoryContextStore::new(&GrantConfig {
            context_lifetime: std::time::Duration::from_millis(1),
            authorization_code_lifetime: std::time::Duration::from_millis(1),
            ..GrantConfig::default()
        });
        store
            .save(&authorization(), (AUTHORIZATION_CODE_PROPERTY, "code-1"))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        assert!(store.retrieve(&token("code-1")).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_save_with_unrepresentable_lifetime() {
        let store = InMemoryContextStore::new(&GrantConfig {
            context_lifetime: std::time::Duration::from_secs(u64::MAX),
            ..GrantConfig::default()
        });

        let err = store
            .save(&authorization(), (AUTHORIZATION_CODE_PROPERTY, "code-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Configuration { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let store = InMemoryContextStore::new(&GrantConfig {
            context_lifetime: std::time::Duration::from_millis(1),
            authorization_code_lifetime: std::time::Duration::from_millis(1),
            ..GrantConfig::default()
        });
        store
            .save(&authorization(), (AUTHORIZATION_CODE_PROPERTY, "a"))
            .await
            .unwrap();
        store
            .save(&authorization(), (AUTHORIZATION_CODE_PROPERTY, "b"))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        assert_eq!(store.cleanup_expired(), 2);
    }
}
