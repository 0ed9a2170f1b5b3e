//! Grant context: the server-side record binding an authorization code to
//! the request data needed when the code is redeemed.
//!
//! # Lifecycle
//!
//! 1. Saved by the context store once the code has been issued
//! 2. Retrieved once by the token request presenting that code
//! 3. Expired or purged by the store afterwards
//!
//! The scope in a token response always comes from here, never from the
//! token request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::AuthResult;
use crate::config::expiry_after;
use crate::error::AuthError;
use crate::oauth::authorize::ValidatedAuthorizationRequest;
use crate::oauth::pkce::PkceChallenge;

/// Property name under which the issued authorization code is recorded.
pub const AUTHORIZATION_CODE_PROPERTY: &str = "authorization_code";

/// Request-derived state persisted between the two grant phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    /// Unique context identifier.
    pub id: Uuid,

    /// Client that initiated the authorization request.
    pub client_id: String,

    /// Redirect URI as supplied in the authorization request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,

    /// Scope recorded at authorization time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// State from the authorization request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// PKCE challenge from the authorization request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_challenge: Option<String>,

    /// Additional named entries (e.g. the code association).
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    /// Timestamp when the context was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Timestamp after which the context can no longer be retrieved.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl Context {
    /// Builds a context from a validated authorization request and one
    /// named property.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if `lifetime` pushes the expiry out of range.
    pub fn from_request(
        request: &ValidatedAuthorizationRequest,
        property: (&str, &str),
        lifetime: Duration,
    ) -> AuthResult<Self> {
        let now = OffsetDateTime::now_utc();
        let expires_at = expiry_after(now, lifetime)?;
        let mut properties = BTreeMap::new();
        properties.insert(property.0.to_string(), property.1.to_string());

        Ok(Self {
            id: Uuid::new_v4(),
            client_id: request.client_id.clone(),
            redirect_uri: request.redirect_uri.clone(),
            scope: request.scope.clone(),
            state: request.state.clone(),
            code_challenge: request
                .code_challenge
                .as_ref()
                .map(|c| c.as_str().to_string()),
            properties,
            created_at: now,
            expires_at,
        })
    }

    /// Returns the value of a named property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Returns the authorization code this context is bound to.
    #[must_use]
    pub fn authorization_code(&self) -> Option<&str> {
        self.property(AUTHORIZATION_CODE_PROPERTY)
    }

    /// Returns the recorded PKCE challenge.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the stored challenge no longer parses.
    pub fn pkce_challenge(&self) -> AuthResult<Option<PkceChallenge>> {
        self.code_challenge
            .as_ref()
            .map(|c| {
                PkceChallenge::new(c.clone()).map_err(|e| {
                    AuthError::internal(format!("Stored PKCE challenge is corrupt: {}", e))
                })
            })
            .transpose()
    }

    /// Returns `true` if the context has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires_at
    }

    /// Returns `true` if a token request for `client_id` presenting
    /// `redirect_uri` belongs to this context.
    #[must_use]
    pub fn is_bound_to(&self, client_id: &str, redirect_uri: &str) -> bool {
        self.client_id == client_id
            && self
                .redirect_uri
                .as_deref()
                .is_none_or(|uri| uri == redirect_uri)
    }

    #[cfg(test)]
    pub(crate) fn for_test(client_id: &str) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            client_id: client_id.to_string(),
            redirect_uri: None,
            scope: None,
            state: None,
            code_challenge: None,
            properties: BTreeMap::new(),
            created_at: now,
            expires_at: now + Duration::minutes(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::authorize::AuthorizationRequest;

    fn validated() -> ValidatedAuthorizationRequest {
        AuthorizationRequest::new("c1")
            .with_redirect_uri("https://app/cb")
            .with_scope("read")
            .with_state("xyz")
            .validate()
            .unwrap()
    }

    #[test]
    fn test_from_request_records_binding() {
        let context = Context::from_request(
            &validated(),
            (AUTHORIZATION_CODE_PROPERTY, "code-1"),
            Duration::minutes(10),
        )
        .unwrap();

        assert_eq!(context.client_id, "c1");
        assert_eq!(context.scope.as_deref(), Some("read"));
        assert_eq!(context.state.as_deref(), Some("xyz"));
        assert_eq!(context.authorization_code(), Some("code-1"));
        assert!(!context.is_expired());
    }

    #[test]
    fn test_expired_context() {
        let context = Context::from_request(
            &validated(),
            (AUTHORIZATION_CODE_PROPERTY, "code-1"),
            Duration::seconds(-1),
        )
        .unwrap();
        assert!(context.is_expired());
    }

    #[test]
    fn test_unrepresentable_lifetime() {
        let err = Context::from_request(
            &validated(),
            (AUTHORIZATION_CODE_PROPERTY, "code-1"),
            Duration::MAX,
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::Configuration { .. }));
    }

    #[test]
    fn test_is_bound_to() {
        let context = Context::from_request(
            &validated(),
            (AUTHORIZATION_CODE_PROPERTY, "code-1"),
            Duration::minutes(10),
        )
        .unwrap();

        assert!(context.is_bound_to("c1", "https://app/cb"));
        assert!(!context.is_bound_to("c2", "https://app/cb"));
        assert!(!context.is_bound_to("c1", "https://app/other"));
    }

    #[test]
    fn test_is_bound_to_without_recorded_redirect_uri() {
        let context = Context::for_test("c1");
        assert!(context.is_bound_to("c1", "https://anything/cb"));
    }

    #[test]
    fn test_pkce_challenge() {
        let mut context = Context::for_test("c1");
        assert!(context.pkce_challenge().unwrap().is_none());

        context.code_challenge = Some("E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM".to_string());
        assert!(context.pkce_challenge().unwrap().is_some());

        context.code_challenge = Some("corrupt".to_string());
        assert!(matches!(
            context.pkce_challenge(),
            Err(AuthError::Internal { .. })
        ));
    }

    #[test]
    fn test_context_serde_roundtrip() {
        let context = Context::from_request(
            &validated(),
            (AUTHORIZATION_CODE_PROPERTY, "code-1"),
            Duration::minutes(10),
        )
        .unwrap();
        let json = serde_json::to_string(&context).unwrap();
        assert!(json.contains(r#""clientId":"c1""#));

        let back: Context = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, context.id);
        assert_eq!(back.authorization_code(), Some("code-1"));
    }
}
