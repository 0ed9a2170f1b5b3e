//! Token request and response types.
//!
//! The token request is the second message of the authorization code flow.
//! Its required fields are guaranteed by [`ValidatedTokenRequest`], so the
//! engine never has to assert presence after validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::AuthResult;
use crate::oauth::authorize::required;
use crate::oauth::context::Context;
use crate::oauth::pkce::PkceVerifier;

/// Token request parameters as received from the transport.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenRequest {
    /// Client identifier.
    #[serde(default)]
    pub client_id: Option<String>,

    /// Client secret.
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Redirect URI (must belong to the client and to the code's context).
    #[serde(default)]
    pub redirect_uri: Option<String>,

    /// Authorization code obtained from the authorization response.
    #[serde(default)]
    pub code: Option<String>,

    /// PKCE code verifier.
    #[serde(default)]
    pub code_verifier: Option<String>,
}

/// A token request whose required fields are present and well-formed.
#[derive(Clone)]
pub struct ValidatedTokenRequest {
    /// Client identifier.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
    /// Redirect URI.
    pub redirect_uri: String,
    /// Authorization code.
    pub code: String,
    /// PKCE code verifier, if supplied.
    pub code_verifier: Option<PkceVerifier>,
}

impl fmt::Debug for ValidatedTokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedTokenRequest")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("code", &"<redacted>")
            .field("code_verifier", &self.code_verifier.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl TokenRequest {
    /// Creates a token request carrying all required fields.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
            redirect_uri: Some(redirect_uri.into()),
            code: Some(code.into()),
            code_verifier: None,
        }
    }

    /// Sets the PKCE code verifier.
    #[must_use]
    pub fn with_code_verifier(mut self, verifier: impl Into<String>) -> Self {
        self.code_verifier = Some(verifier.into());
        self
    }

    /// Checks the request's own fields and returns the refined request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if `client_id`, `client_secret`,
    /// `redirect_uri` or `code` is missing or empty, or if `code_verifier`
    /// is present but malformed.
    pub fn validate(self) -> AuthResult<ValidatedTokenRequest> {
        let client_id = required(self.client_id, "client_id")?;
        let client_secret = required(self.client_secret, "client_secret")?;
        let redirect_uri = required(self.redirect_uri, "redirect_uri")?;
        let code = required(self.code, "code")?;
        let code_verifier = self.code_verifier.map(PkceVerifier::new).transpose()?;

        Ok(ValidatedTokenRequest {
            client_id,
            client_secret,
            redirect_uri,
            code,
            code_verifier,
        })
    }
}

/// Access token type. Only bearer tokens are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TokenType {
    /// RFC 6750 bearer token.
    #[default]
    Bearer,
}

impl TokenType {
    /// Returns the `token_type` value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bearer => "Bearer",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Successful token response.
///
/// ```json
/// {
///   "access_token": "2YotnFZFEjr1zCsicMWpAA",
///   "token_type": "Bearer",
///   "expires_in": 3600,
///   "refresh_token": "tGzv3JOkF0XG5Qx2TlKWIA",
///   "scope": "read"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    /// The context the redeemed code was bound to.
    #[serde(skip)]
    pub context: Context,

    /// The access token.
    pub access_token: String,

    /// Token type, always `Bearer`.
    pub token_type: TokenType,

    /// Access token lifetime in seconds.
    pub expires_in: u64,

    /// The refresh token.
    pub refresh_token: String,

    /// Scope recorded at authorization time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;

    fn scenario_b() -> TokenRequest {
        TokenRequest::new("c1", "s1", "https://app/cb", "code-1")
    }

    #[test]
    fn test_token_request_deserialize() {
        let json = r#"{
            "client_id": "c1",
            "client_secret": "s1",
            "redirect_uri": "https://app/cb",
            "code": "code-1"
        }"#;
        let request: TokenRequest = serde_json::from_str(json).unwrap();
        let validated = request.validate().unwrap();
        assert_eq!(validated.client_id, "c1");
        assert_eq!(validated.code, "code-1");
        assert!(validated.code_verifier.is_none());
    }

    #[test]
    fn test_validate_requires_each_field() {
        for field in ["client_id", "client_secret", "redirect_uri", "code"] {
            let mut request = scenario_b();
            match field {
                "client_id" => request.client_id = None,
                "client_secret" => request.client_secret = Some(String::new()),
                "redirect_uri" => request.redirect_uri = None,
                _ => request.code = Some(String::new()),
            }
            let err = request.validate().unwrap_err();
            assert!(
                matches!(&err, AuthError::InvalidRequest { message } if message.contains(field)),
                "unexpected error for {}: {}",
                field,
                err
            );
        }
    }

    #[test]
    fn test_validate_rejects_short_verifier() {
        let request = scenario_b().with_code_verifier("too-short");
        assert!(matches!(request.validate(), Err(AuthError::InvalidRequest { .. })));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let validated = scenario_b().validate().unwrap();
        let debug = format!("{:?}", validated);
        assert!(debug.contains("c1"));
        assert!(!debug.contains("s1\""));
        assert!(!debug.contains("code-1"));
    }

    #[test]
    fn test_token_response_serialize() {
        let response = TokenResponse {
            context: Context::for_test("c1"),
            access_token: "at".to_string(),
            token_type: TokenType::Bearer,
            expires_in: 3600,
            refresh_token: "rt".to_string(),
            scope: Some("read".to_string()),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["expires_in"], 3600);
        assert_eq!(json["scope"], "read");
        assert!(json.get("context").is_none());
    }
}
