//! Grant engine error types.
//!
//! Every variant is fatal to the request that produced it. The engine never
//! retries and never rolls back; callers map the variant to the protocol
//! error code with [`AuthError::oauth_error_code`].

use std::fmt;

/// Errors that can occur while servicing an authorization code grant.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request is missing a required field or carries a malformed value.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of why the request is invalid.
        message: String,
    },

    /// No (active) client is registered under the given identifier.
    #[error("Client not registered: {client_id}")]
    ClientNotRegistered {
        /// The unknown client identifier.
        client_id: String,
    },

    /// The client is not allowed to use the requested response type.
    #[error("Unauthorized response type: {response_type}")]
    UnauthorizedResponseType {
        /// The rejected response type.
        response_type: String,
    },

    /// The redirect URI is not registered for the client or cannot be resolved.
    #[error("Invalid redirect URI: {redirect_uri}")]
    InvalidRedirectUri {
        /// The rejected redirect URI (empty when none was supplied).
        redirect_uri: String,
    },

    /// The token request does not resolve to a context saved at authorization time.
    #[error("Context not set up for this authorization code")]
    ContextNotSetup,

    /// The client credentials did not verify.
    #[error("Client authentication failed: {client_id}")]
    ClientAuthenticationFailed {
        /// The client that failed to authenticate.
        client_id: String,
    },

    /// The authorization code could not be consumed (unknown, expired or already used).
    #[error("Authorization code rejected: {message}")]
    AuthorizationCodeRejected {
        /// Description of why the code was rejected.
        message: String,
    },

    /// PKCE code verifier is missing or does not match the recorded challenge.
    #[error("PKCE verification failed")]
    PkceVerificationFailed,

    /// A collaborator store failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The grant configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `InvalidRequest` error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a new `ClientNotRegistered` error.
    #[must_use]
    pub fn client_not_registered(client_id: impl Into<String>) -> Self {
        Self::ClientNotRegistered {
            client_id: client_id.into(),
        }
    }

    /// Creates a new `UnauthorizedResponseType` error.
    #[must_use]
    pub fn unauthorized_response_type(response_type: impl Into<String>) -> Self {
        Self::UnauthorizedResponseType {
            response_type: response_type.into(),
        }
    }

    /// Creates a new `InvalidRedirectUri` error.
    #[must_use]
    pub fn invalid_redirect_uri(redirect_uri: impl Into<String>) -> Self {
        Self::InvalidRedirectUri {
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Creates a new `ClientAuthenticationFailed` error.
    #[must_use]
    pub fn client_authentication_failed(client_id: impl Into<String>) -> Self {
        Self::ClientAuthenticationFailed {
            client_id: client_id.into(),
        }
    }

    /// Creates a new `AuthorizationCodeRejected` error.
    #[must_use]
    pub fn code_rejected(message: impl Into<String>) -> Self {
        Self::AuthorizationCodeRejected {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if the caller sent something the server rejects (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. }
                | Self::ClientNotRegistered { .. }
                | Self::UnauthorizedResponseType { .. }
                | Self::InvalidRedirectUri { .. }
                | Self::ContextNotSetup
                | Self::ClientAuthenticationFailed { .. }
                | Self::AuthorizationCodeRejected { .. }
                | Self::PkceVerificationFailed
        )
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Storage { .. } | Self::Configuration { .. } | Self::Internal { .. }
        )
    }

    /// Returns `true` if the error concerns the identity of the client.
    #[must_use]
    pub fn is_client_identity_error(&self) -> bool {
        matches!(
            self,
            Self::ClientNotRegistered { .. } | Self::ClientAuthenticationFailed { .. }
        )
    }

    /// Returns `true` if the error concerns the authorization grant itself.
    #[must_use]
    pub fn is_grant_error(&self) -> bool {
        matches!(
            self,
            Self::ContextNotSetup
                | Self::AuthorizationCodeRejected { .. }
                | Self::PkceVerificationFailed
        )
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRequest { .. } => ErrorCategory::Validation,
            Self::ClientNotRegistered { .. } => ErrorCategory::Authentication,
            Self::UnauthorizedResponseType { .. } => ErrorCategory::Capability,
            Self::InvalidRedirectUri { .. } => ErrorCategory::Capability,
            Self::ContextNotSetup => ErrorCategory::Grant,
            Self::ClientAuthenticationFailed { .. } => ErrorCategory::Authentication,
            Self::AuthorizationCodeRejected { .. } => ErrorCategory::Grant,
            Self::PkceVerificationFailed => ErrorCategory::Grant,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the OAuth 2.0 error code for this error (RFC 6749 §4.1.2.1 and §5.2).
    #[must_use]
    pub fn oauth_error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::ClientNotRegistered { .. } => "invalid_client",
            Self::UnauthorizedResponseType { .. } => "unauthorized_client",
            Self::InvalidRedirectUri { .. } => "invalid_request",
            Self::ContextNotSetup => "invalid_grant",
            Self::ClientAuthenticationFailed { .. } => "invalid_client",
            Self::AuthorizationCodeRejected { .. } => "invalid_grant",
            Self::PkceVerificationFailed => "invalid_grant",
            Self::Storage { .. } => "server_error",
            Self::Configuration { .. } => "server_error",
            Self::Internal { .. } => "server_error",
        }
    }
}

/// Categories of grant errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed request fields.
    Validation,
    /// Client identity: unknown client or bad credentials.
    Authentication,
    /// Client capability mismatch (response type, redirect URI).
    Capability,
    /// Authorization grant problems (context, code, PKCE).
    Grant,
    /// Store/backend failures.
    Infrastructure,
    /// Configuration errors.
    Configuration,
    /// Internal server errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Authentication => write!(f, "authentication"),
            Self::Capability => write!(f, "capability"),
            Self::Grant => write!(f, "grant"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::client_not_registered("c1");
        assert_eq!(err.to_string(), "Client not registered: c1");

        let err = AuthError::client_authentication_failed("c1");
        assert_eq!(err.to_string(), "Client authentication failed: c1");

        let err = AuthError::ContextNotSetup;
        assert_eq!(
            err.to_string(),
            "Context not set up for this authorization code"
        );

        let err = AuthError::code_rejected("already consumed");
        assert_eq!(
            err.to_string(),
            "Authorization code rejected: already consumed"
        );
    }

    #[test]
    fn test_error_predicates() {
        let err = AuthError::invalid_request("missing client_id");
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert!(!err.is_grant_error());

        let err = AuthError::client_authentication_failed("c1");
        assert!(err.is_client_identity_error());
        assert!(!err.is_grant_error());

        let err = AuthError::code_rejected("replay");
        assert!(err.is_grant_error());
        assert!(!err.is_client_identity_error());

        let err = AuthError::storage("database down");
        assert!(!err.is_client_error());
        assert!(err.is_server_error());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AuthError::invalid_request("x").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            AuthError::invalid_redirect_uri("https://evil").category(),
            ErrorCategory::Capability
        );
        assert_eq!(AuthError::ContextNotSetup.category(), ErrorCategory::Grant);
        assert_eq!(
            AuthError::storage("x").category(),
            ErrorCategory::Infrastructure
        );
    }

    #[test]
    fn test_code_rejection_is_distinct_from_authentication_failure() {
        let auth = AuthError::client_authentication_failed("c1");
        let code = AuthError::code_rejected("consumed");

        assert_ne!(auth.category(), code.category());
        assert_eq!(auth.oauth_error_code(), "invalid_client");
        assert_eq!(code.oauth_error_code(), "invalid_grant");
    }

    #[test]
    fn test_oauth_error_code() {
        assert_eq!(
            AuthError::unauthorized_response_type("token").oauth_error_code(),
            "unauthorized_client"
        );
        assert_eq!(
            AuthError::PkceVerificationFailed.oauth_error_code(),
            "invalid_grant"
        );
        assert_eq!(
            AuthError::internal("x").oauth_error_code(),
            "server_error"
        );
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::Capability.to_string(), "capability");
        assert_eq!(ErrorCategory::Grant.to_string(), "grant");
    }
}
