//! # grantflow-auth
//!
//! OAuth 2.0 authorization code grant engine.
//!
//! The engine validates and services the two messages of the grant: the
//! authorization request, which yields a code bound to the request, and the
//! token request, which redeems that code for an access and a refresh token.
//! Everything stateful sits behind traits injected at construction.
//!
//! ## Modules
//!
//! - [`config`] - Code, context and token lifetimes
//! - [`error`] - Error taxonomy and OAuth error codes
//! - [`oauth`] - Request/response types, PKCE and the grant engine
//! - [`secret`] - Client secret generation and hashing
//! - [`storage`] - Client registry, code store and context store traits
//! - [`token`] - Token issuer trait and the opaque token issuer
//! - [`types`] - Client registration types

pub mod config;
pub mod error;
pub mod oauth;
pub mod secret;
pub mod storage;
pub mod token;
pub mod types;

pub use config::{ConfigError, GrantConfig};
pub use error::{AuthError, ErrorCategory};
pub use oauth::{
    AuthorizationCodeGrant, AuthorizationRequest, AuthorizationResponse, ClientAuthenticator,
    Context, Grant, GrantRequest, GrantResponse, SecretClientAuthenticator, TokenRequest,
    TokenResponse, TokenType,
};
pub use storage::{ClientRegistry, CodeStore, ContextStore};
pub use token::{IssuedToken, OpaqueTokenIssuer, TokenIssuer};
pub use types::{Client, ClientValidationError, ResponseType};

/// Type alias for grant results.
pub type AuthResult<T> = Result<T, AuthError>;
