//! OAuth 2.0 Client domain types.
//!
//! A [`Client`] is owned by the client registry. The grant engine only reads
//! it: it asks the client whether a response type is allowed and which
//! redirect URI a request resolves to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AuthResult;
use crate::error::AuthError;

// =============================================================================
// Response Type
// =============================================================================

/// OAuth 2.0 authorization endpoint response types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Authorization code (`code`).
    Code,
    /// Implicit access token (`token`). Registrable, but never serviced here.
    Token,
}

impl ResponseType {
    /// Returns the `response_type` parameter value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Token => "token",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(Self::Code),
            "token" => Ok(Self::Token),
            other => Err(AuthError::invalid_request(format!(
                "Unknown response_type: '{}'",
                other
            ))),
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// OAuth 2.0 client registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Unique client identifier used in OAuth flows.
    pub client_id: String,

    /// Argon2id PHC hash of the client secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Human-readable display name.
    pub name: String,

    /// Registered redirect URIs.
    #[serde(default)]
    pub redirect_uris: Vec<String>,

    /// Response types this client may request at the authorization endpoint.
    #[serde(default = "default_response_types")]
    pub response_types: Vec<ResponseType>,

    /// Whether this client is currently active and can be used.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_response_types() -> Vec<ResponseType> {
    vec![ResponseType::Code]
}

fn default_active() -> bool {
    true
}

impl Client {
    /// Creates an active client allowed to use the `code` response type.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        name: impl Into<String>,
        redirect_uris: Vec<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            name: name.into(),
            redirect_uris,
            response_types: default_response_types(),
            active: true,
        }
    }

    /// Sets the stored secret hash.
    #[must_use]
    pub fn with_secret_hash(mut self, hash: impl Into<String>) -> Self {
        self.client_secret = Some(hash.into());
        self
    }

    /// Replaces the allowed response types.
    #[must_use]
    pub fn with_response_types(mut self, response_types: Vec<ResponseType>) -> Self {
        self.response_types = response_types;
        self
    }

    /// Validates the registration itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the client configuration is invalid.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if self.client_id.is_empty() {
            return Err(ClientValidationError::EmptyClientId);
        }

        if self.name.is_empty() {
            return Err(ClientValidationError::EmptyName);
        }

        if self.response_types.is_empty() {
            return Err(ClientValidationError::NoResponseTypes);
        }

        if self.client_secret.is_none() {
            return Err(ClientValidationError::MissingSecret);
        }

        if self.response_types.contains(&ResponseType::Code) && self.redirect_uris.is_empty() {
            return Err(ClientValidationError::NoRedirectUris);
        }

        Ok(())
    }

    /// Checks if the given redirect URI is registered for this client.
    ///
    /// Comparison is exact string equality.
    #[must_use]
    pub fn is_redirect_uri_allowed(&self, uri: &str) -> bool {
        self.redirect_uris.iter().any(|allowed| allowed == uri)
    }

    /// Confirms the client may use `response_type`.
    ///
    /// # Errors
    ///
    /// Returns `UnauthorizedResponseType` if the type is not registered.
    pub fn validate_response_type(&self, response_type: ResponseType) -> AuthResult<()> {
        if self.response_types.contains(&response_type) {
            Ok(())
        } else {
            Err(AuthError::unauthorized_response_type(response_type.as_str()))
        }
    }

    /// Validates a requested redirect URI and resolves the one to use.
    ///
    /// A supplied URI must match a registered one exactly. Without one, the
    /// registration must hold exactly one URI (RFC 6749 §3.1.2.3).
    ///
    /// # Errors
    ///
    /// Returns `InvalidRedirectUri` when the URI is unregistered or cannot be
    /// resolved unambiguously.
    pub fn resolve_redirect_uri(&self, requested: Option<&str>) -> AuthResult<String> {
        match requested {
            Some(uri) if self.is_redirect_uri_allowed(uri) => Ok(uri.to_string()),
            Some(uri) => Err(AuthError::invalid_redirect_uri(uri)),
            None => match self.redirect_uris.as_slice() {
                [only] => Ok(only.clone()),
                _ => Err(AuthError::invalid_redirect_uri("")),
            },
        }
    }
}

/// Errors that can occur when validating a client registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientValidationError {
    /// Client ID is empty.
    #[error("client_id cannot be empty")]
    EmptyClientId,

    /// Client name is empty.
    #[error("name cannot be empty")]
    EmptyName,

    /// No response types specified.
    #[error("at least one response type is required")]
    NoResponseTypes,

    /// No secret hash registered.
    #[error("client must have a client_secret")]
    MissingSecret,

    /// The `code` response type requires redirect URIs.
    #[error("code response type requires at least one redirect_uri")]
    NoRedirectUris,
}
