//! Authorization request and response types.
//!
//! The authorization request is the first message of the authorization code
//! flow. It is validated structurally by [`AuthorizationRequest::validate`],
//! which yields a [`ValidatedAuthorizationRequest`] whose required fields are
//! guaranteed present. Client-dependent checks (response type, redirect URI)
//! happen later in the grant engine.

use serde::{Deserialize, Serialize};

use crate::AuthResult;
use crate::error::AuthError;
use crate::oauth::context::Context;
use crate::oauth::pkce::{PkceChallenge, PkceChallengeMethod};
use crate::types::ResponseType;

/// Authorization request parameters as received from the transport.
///
/// ```ignore
/// GET /authorize?
///   response_type=code
///   &client_id=c1
///   &redirect_uri=https://app/cb
///   &scope=read
///   &state=xyz
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizationRequest {
    /// Requested response type; must be `code` for this grant.
    #[serde(default)]
    pub response_type: Option<String>,

    /// Client identifier issued during registration.
    #[serde(default)]
    pub client_id: Option<String>,

    /// Redirect URI. When absent the client's single registered URI is used.
    #[serde(default)]
    pub redirect_uri: Option<String>,

    /// Requested scope (space-separated).
    #[serde(default)]
    pub scope: Option<String>,

    /// Opaque CSRF correlation value, echoed back untouched.
    #[serde(default)]
    pub state: Option<String>,

    /// PKCE code challenge.
    #[serde(default)]
    pub code_challenge: Option<String>,

    /// PKCE code challenge method.
    #[serde(default)]
    pub code_challenge_method: Option<String>,
}

/// An authorization request whose fields passed structural validation.
#[derive(Debug, Clone)]
pub struct ValidatedAuthorizationRequest {
    /// Client identifier (non-empty).
    pub client_id: String,
    /// Parsed response type.
    pub response_type: ResponseType,
    /// Requested redirect URI, if any (absolute URL).
    pub redirect_uri: Option<String>,
    /// Requested scope, if any (non-empty).
    pub scope: Option<String>,
    /// Echoed state, if any.
    pub state: Option<String>,
    /// PKCE challenge, if supplied.
    pub code_challenge: Option<PkceChallenge>,
}

impl AuthorizationRequest {
    /// Creates a request for the `code` response type.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            response_type: Some(ResponseType::Code.as_str().to_string()),
            client_id: Some(client_id.into()),
            ..Self::default()
        }
    }

    /// Sets the redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Sets the scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets the state.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Sets an S256 PKCE challenge.
    #[must_use]
    pub fn with_pkce(mut self, challenge: &PkceChallenge) -> Self {
        self.code_challenge = Some(challenge.as_str().to_string());
        self.code_challenge_method = Some(PkceChallengeMethod::S256.as_str().to_string());
        self
    }

    /// Checks the request's own fields and returns the refined request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if:
    /// - `client_id` or `response_type` is missing or empty
    /// - `response_type` is unknown
    /// - `redirect_uri` is empty or not an absolute URL
    /// - `scope` is present but empty
    ///
    /// An empty `state` is treated as absent.
    /// - only one of the PKCE parameters is present, or either is malformed
    pub fn validate(self) -> AuthResult<ValidatedAuthorizationRequest> {
        let client_id = required(self.client_id, "client_id")?;

        let response_type: ResponseType = required(self.response_type, "response_type")?.parse()?;

        if let Some(ref uri) = self.redirect_uri {
            if uri.is_empty() {
                return Err(AuthError::invalid_request("redirect_uri cannot be empty"));
            }
            url::Url::parse(uri).map_err(|e| {
                AuthError::invalid_request(format!("redirect_uri is not an absolute URL: {}", e))
            })?;
        }

        let scope = optional_non_empty(self.scope, "scope")?;
        let state = self.state.filter(|s| !s.is_empty());

        let code_challenge = match (self.code_challenge, self.code_challenge_method) {
            (None, None) => None,
            (Some(challenge), Some(method)) => {
                PkceChallengeMethod::parse(&method)?;
                Some(PkceChallenge::new(challenge)?)
            }
            _ => {
                return Err(AuthError::invalid_request(
                    "Both code_challenge and code_challenge_method must be provided together",
                ));
            }
        };

        Ok(ValidatedAuthorizationRequest {
            client_id,
            response_type,
            redirect_uri: self.redirect_uri,
            scope,
            state,
            code_challenge,
        })
    }
}

pub(crate) fn required(value: Option<String>, name: &str) -> AuthResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AuthError::invalid_request(format!(
            "Missing required parameter: {}",
            name
        ))),
    }
}

fn optional_non_empty(value: Option<String>, name: &str) -> AuthResult<Option<String>> {
    match value {
        Some(v) if v.is_empty() => Err(AuthError::invalid_request(format!(
            "{} cannot be empty when present",
            name
        ))),
        other => Ok(other),
    }
}

/// Successful authorization response.
///
/// The context is carried for the caller but never serialized; only
/// `code`, `state` and the redirect target leave the server.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationResponse {
    /// The context saved for this code.
    #[serde(skip)]
    pub context: Context,

    /// Redirect URI the user agent is sent back to.
    pub redirect_uri: String,

    /// Authorization code to be exchanged for tokens.
    pub code: String,

    /// State echoed verbatim from the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl AuthorizationResponse {
    /// Builds the redirect URL carrying `code` and, when present, `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the redirect URI is not a valid URL.
    pub fn to_redirect_url(&self) -> Result<String, url::ParseError> {
        let mut url = url::Url::parse(&self.redirect_uri)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("code", &self.code);
            if let Some(ref state) = self.state {
                pairs.append_pair("state", state);
            }
        }
        Ok(url.to_string())
    }
}

/// Authorization error response, delivered by redirect when the redirect URI
/// itself was valid.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationError {
    /// OAuth 2.0 error code.
    pub error: &'static str,

    /// Human-readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,

    /// Echoed state parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl AuthorizationError {
    /// Builds the error response for a failed authorization request.
    #[must_use]
    pub fn from_auth_error(err: &AuthError, state: Option<String>) -> Self {
        Self {
            error: err.oauth_error_code(),
            error_description: Some(err.to_string()),
            state,
        }
    }

    /// Returns `false` for errors that must not be redirected back to the
    /// client: an unverified redirect URI or unknown client (RFC 6749 §4.1.2.1).
    #[must_use]
    pub fn may_redirect(err: &AuthError) -> bool {
        !matches!(
            err,
            AuthError::InvalidRedirectUri { .. } | AuthError::ClientNotRegistered { .. }
        )
    }

    /// Builds the redirect URL with error parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the redirect URI is not a valid URL.
    pub fn to_redirect_url(&self, redirect_uri: &str) -> Result<String, url::ParseError> {
        let mut url = url::Url::parse(redirect_uri)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("error", self.error);
            if let Some(ref desc) = self.error_description {
                pairs.append_pair("error_description", desc);
            }
            if let Some(ref state) = self.state {
                pairs.append_pair("state", state);
            }
        }
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::pkce::PkceVerifier;

    fn scenario_a() -> AuthorizationRequest {
        AuthorizationRequest::new("c1")
            .with_redirect_uri("https://app/cb")
            .with_scope("read")
            .with_state("xyz")
    }

    #[test]
    fn test_authorization_request_deserialize() {
        let json = r#"{
            "response_type": "code",
            "client_id": "c1",
            "redirect_uri": "https://app/cb",
            "scope": "read",
            "state": "xyz"
        }"#;

        let request: AuthorizationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.client_id.as_deref(), Some("c1"));
        assert_eq!(request.state.as_deref(), Some("xyz"));
        assert!(request.code_challenge.is_none());
    }

    #[test]
    fn test_validate_scenario_a() {
        let validated = scenario_a().validate().unwrap();
        assert_eq!(validated.client_id, "c1");
        assert_eq!(validated.response_type, ResponseType::Code);
        assert_eq!(validated.redirect_uri.as_deref(), Some("https://app/cb"));
        assert_eq!(validated.scope.as_deref(), Some("read"));
        assert_eq!(validated.state.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_validate_missing_client_id() {
        let mut request = scenario_a();
        request.client_id = None;
        assert!(matches!(
            request.validate(),
            Err(AuthError::InvalidRequest { message }) if message.contains("client_id")
        ));
    }

    #[test]
    fn test_validate_empty_state_is_absent() {
        let validated = scenario_a().with_state("").validate().unwrap();
        assert!(validated.state.is_none());
    }

    #[test]
    fn test_validate_empty_scope() {
        let request = scenario_a().with_scope("");
        assert!(matches!(request.validate(), Err(AuthError::InvalidRequest { .. })));
    }

    #[test]
    fn test_validate_empty_client_id() {
        let mut request = scenario_a();
        request.client_id = Some(String::new());
        assert!(matches!(request.validate(), Err(AuthError::InvalidRequest { .. })));
    }

    #[test]
    fn test_validate_response_type() {
        let mut request = scenario_a();
        request.response_type = Some("token".to_string());
        assert_eq!(request.validate().unwrap().response_type, ResponseType::Token);

        let mut request = scenario_a();
        request.response_type = Some("id_token".to_string());
        assert!(matches!(request.validate(), Err(AuthError::InvalidRequest { .. })));
    }

    #[test]
    fn test_validate_rejects_relative_redirect_uri() {
        let request = scenario_a().with_redirect_uri("/cb");
        assert!(matches!(request.validate(), Err(AuthError::InvalidRequest { .. })));
    }

    #[test]
    fn test_validate_allows_missing_redirect_uri() {
        let mut request = scenario_a();
        request.redirect_uri = None;
        assert!(request.validate().unwrap().redirect_uri.is_none());
    }

    #[test]
    fn test_validate_rejects_half_pkce() {
        let mut request = scenario_a();
        request.code_challenge = Some("E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM".to_string());
        assert!(matches!(request.validate(), Err(AuthError::InvalidRequest { .. })));
    }

    #[test]
    fn test_validate_rejects_plain_pkce() {
        let mut request = scenario_a();
        request.code_challenge = Some("E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM".to_string());
        request.code_challenge_method = Some("plain".to_string());
        assert!(matches!(request.validate(), Err(AuthError::InvalidRequest { .. })));
    }

    #[test]
    fn test_validate_accepts_pkce() {
        let challenge = PkceChallenge::from_verifier(&PkceVerifier::generate());
        let validated = scenario_a().with_pkce(&challenge).validate().unwrap();
        assert_eq!(validated.code_challenge, Some(challenge));
    }

    #[test]
    fn test_response_to_redirect_url() {
        let response = AuthorizationResponse {
            context: Context::for_test("c1"),
            redirect_uri: "https://app/cb".to_string(),
            code: "code123".to_string(),
            state: Some("xyz".to_string()),
        };

        let url = response.to_redirect_url().unwrap();
        assert!(url.starts_with("https://app/cb?"));
        assert!(url.contains("code=code123"));
        assert!(url.contains("state=xyz"));
    }

    #[test]
    fn test_response_serialize_skips_context() {
        let response = AuthorizationResponse {
            context: Context::for_test("c1"),
            redirect_uri: "https://app/cb".to_string(),
            code: "code123".to_string(),
            state: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], "code123");
        assert!(json.get("context").is_none());
        assert!(json.get("state").is_none());
    }

    #[test]
    fn test_error_to_redirect_url() {
        let err = AuthError::unauthorized_response_type("code");
        let error = AuthorizationError::from_auth_error(&err, Some("xyz".to_string()));

        let url = error.to_redirect_url("https://app/cb").unwrap();
        assert!(url.contains("error=unauthorized_client"));
        assert!(url.contains("error_description="));
        assert!(url.contains("state=xyz"));
    }

    #[test]
    fn test_error_may_redirect() {
        assert!(!AuthorizationError::may_redirect(
            &AuthError::invalid_redirect_uri("https://evil")
        ));
        assert!(!AuthorizationError::may_redirect(
            &AuthError::client_not_registered("c9")
        ));
        assert!(AuthorizationError::may_redirect(
            &AuthError::unauthorized_response_type("code")
        ));
    }
}
