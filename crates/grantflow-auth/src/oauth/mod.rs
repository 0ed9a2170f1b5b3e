//! OAuth 2.0 authorization code grant.
//!
//! - [`authorize`] - Authorization request/response types
//! - [`token`] - Token request/response types
//! - [`context`] - State carried from authorization to token exchange
//! - [`client_auth`] - Client authentication at the token endpoint
//! - [`pkce`] - PKCE challenge/verifier implementation
//! - [`grant`] - The grant engine
//!
//! # Example
//!
//! ```ignore
//! use grantflow_auth::oauth::{AuthorizationCodeGrant, AuthorizationRequest, TokenRequest};
//!
//! let authorization = grant
//!     .authorize(
//!         AuthorizationRequest::new("c1")
//!             .with_redirect_uri("https://app/cb")
//!             .with_scope("read")
//!             .with_state("xyz"),
//!     )
//!     .await?;
//!
//! let tokens = grant
//!     .exchange(TokenRequest::new("c1", "s1", "https://app/cb", authorization.code))
//!     .await?;
//! assert_eq!(tokens.scope.as_deref(), Some("read"));
//! ```

pub mod authorize;
pub mod client_auth;
pub mod context;
pub mod grant;
pub mod pkce;
pub mod token;

pub use authorize::{
    AuthorizationError, AuthorizationRequest, AuthorizationResponse, ValidatedAuthorizationRequest,
};
pub use client_auth::{ClientAuthenticator, SecretClientAuthenticator};
pub use context::{AUTHORIZATION_CODE_PROPERTY, Context};
pub use grant::{AuthorizationCodeGrant, Grant, GrantRequest, GrantResponse};
pub use pkce::{PkceChallenge, PkceChallengeMethod, PkceError, PkceVerifier};
pub use token::{TokenRequest, TokenResponse, TokenType, ValidatedTokenRequest};
