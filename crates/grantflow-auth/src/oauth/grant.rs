//! Authorization code grant engine.
//!
//! [`AuthorizationCodeGrant`] orchestrates the injected collaborators into the
//! two protocol steps. It owns no state: every call awaits its collaborators
//! one after another and returns, so one engine can serve any number of
//! concurrent callers.
//!
//! # Authorization request
//!
//! 1. Structural validation (`InvalidRequest`)
//! 2. Client resolution (`ClientNotRegistered`)
//! 3. Response type check (`UnauthorizedResponseType`)
//! 4. Redirect URI validation and resolution (`InvalidRedirectUri`)
//! 5. Code issuance
//! 6. Context persistence
//!
//! # Token request
//!
//! 1. Structural validation (`InvalidRequest`)
//! 2. Context retrieval (`ContextNotSetup`)
//! 3. Client resolution (`ClientNotRegistered`)
//! 4. Client authentication (`ClientAuthenticationFailed`)
//! 5. PKCE verification when a challenge was recorded (`PkceVerificationFailed`)
//! 6. Code consumption (`AuthorizationCodeRejected`)
//! 7. Access and refresh token issuance
//!
//! The order is part of the contract: clients branch on which error a
//! malformed request produces first.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::AuthResult;
use crate::config::GrantConfig;
use crate::error::AuthError;
use crate::oauth::authorize::{AuthorizationRequest, AuthorizationResponse};
use crate::oauth::client_auth::ClientAuthenticator;
use crate::oauth::context::AUTHORIZATION_CODE_PROPERTY;
use crate::oauth::token::{TokenRequest, TokenResponse, TokenType};
use crate::storage::{ClientRegistry, CodeStore, ContextStore};
use crate::token::TokenIssuer;
use crate::types::{Client, ResponseType};

/// A grant: one protocol exchange from request to response.
#[async_trait]
pub trait Grant: Send + Sync {
    /// Request union accepted by the grant.
    type Request: Send;
    /// Response union produced by the grant.
    type Response;

    /// Services one request.
    async fn flow(&self, request: Self::Request) -> AuthResult<Self::Response>;
}

/// The two messages of the authorization code grant.
#[derive(Debug, Clone)]
pub enum GrantRequest {
    /// First message: obtain an authorization code.
    Authorization(AuthorizationRequest),
    /// Second message: exchange the code for tokens.
    Token(TokenRequest),
}

/// Responses matching [`GrantRequest`] variant for variant.
#[derive(Debug, Clone)]
pub enum GrantResponse {
    /// Response to [`GrantRequest::Authorization`].
    Authorization(AuthorizationResponse),
    /// Response to [`GrantRequest::Token`].
    Token(TokenResponse),
}

impl GrantResponse {
    /// Returns the authorization response, if this is one.
    #[must_use]
    pub fn into_authorization(self) -> Option<AuthorizationResponse> {
        match self {
            Self::Authorization(response) => Some(response),
            Self::Token(_) => None,
        }
    }

    /// Returns the token response, if this is one.
    #[must_use]
    pub fn into_token(self) -> Option<TokenResponse> {
        match self {
            Self::Token(response) => Some(response),
            Self::Authorization(_) => None,
        }
    }
}

/// Authorization code grant engine.
///
/// # Example
///
/// ```ignore
/// let grant = AuthorizationCodeGrant::new(
///     registry,
///     Arc::new(SecretClientAuthenticator::new()),
///     code_store,
///     Arc::new(OpaqueTokenIssuer::new(&config)),
///     context_store,
/// )
/// .with_config(config);
///
/// let response = grant.flow(GrantRequest::Authorization(request)).await?;
/// ```
pub struct AuthorizationCodeGrant {
    client_registry: Arc<dyn ClientRegistry>,
    client_authenticator: Arc<dyn ClientAuthenticator>,
    code_store: Arc<dyn CodeStore>,
    token_issuer: Arc<dyn TokenIssuer>,
    context_store: Arc<dyn ContextStore>,
    config: GrantConfig,
}

impl AuthorizationCodeGrant {
    /// Creates an engine over the five collaborators with default configuration.
    #[must_use]
    pub fn new(
        client_registry: Arc<dyn ClientRegistry>,
        client_authenticator: Arc<dyn ClientAuthenticator>,
        code_store: Arc<dyn CodeStore>,
        token_issuer: Arc<dyn TokenIssuer>,
        context_store: Arc<dyn ContextStore>,
    ) -> Self {
        Self {
            client_registry,
            client_authenticator,
            code_store,
            token_issuer,
            context_store,
            config: GrantConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: GrantConfig) -> Self {
        self.config = config;
        self
    }

    /// Services an authorization request.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error; see the module docs for the order.
    #[tracing::instrument(skip_all, fields(client_id = request.client_id.as_deref().unwrap_or("")))]
    pub async fn authorize(&self, request: AuthorizationRequest) -> AuthResult<AuthorizationResponse> {
        let result = self.handle_authorization_request(request).await;
        if let Err(ref e) = result {
            warn!(category = %e.category(), error = %e, "Authorization request rejected");
        }
        result
    }

    /// Services a token request.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error; see the module docs for the order.
    #[tracing::instrument(skip_all, fields(client_id = request.client_id.as_deref().unwrap_or("")))]
    pub async fn exchange(&self, request: TokenRequest) -> AuthResult<TokenResponse> {
        let result = self.handle_token_request(request).await;
        if let Err(ref e) = result {
            warn!(category = %e.category(), error = %e, "Token request rejected");
        }
        result
    }

    async fn handle_authorization_request(
        &self,
        request: AuthorizationRequest,
    ) -> AuthResult<AuthorizationResponse> {
        // 1. Validate request parameters
        let request = request.validate()?;
        if self.config.require_pkce && request.code_challenge.is_none() {
            return Err(AuthError::invalid_request(
                "PKCE (code_challenge and code_challenge_method) is required",
            ));
        }

        // Resource-owner authentication and consent are established before
        // this handler runs.

        // 2. Resolve client
        let client = self.resolve_client(&request.client_id).await?;

        // 3. Validate response type
        client.validate_response_type(request.response_type)?;
        if request.response_type != ResponseType::Code {
            return Err(AuthError::unauthorized_response_type(request.response_type.as_str()));
        }

        // 4. Validate and resolve redirect URI
        let redirect_uri = client.resolve_redirect_uri(request.redirect_uri.as_deref())?;

        // 5. Issue authorization code
        let code = self.code_store.issue(&request).await?;

        // 6. Save context
        let context = self
            .context_store
            .save(&request, (AUTHORIZATION_CODE_PROPERTY, &code))
            .await?;

        info!(context_id = %context.id, "Authorization code issued");

        Ok(AuthorizationResponse {
            context,
            redirect_uri,
            code,
            state: request.state,
        })
    }

    async fn handle_token_request(&self, request: TokenRequest) -> AuthResult<TokenResponse> {
        // 1. Validate request parameters
        let request = request.validate()?;

        // 2. Retrieve context
        let context = match self.context_store.retrieve(&request).await? {
            Some(context) if context.is_bound_to(&request.client_id, &request.redirect_uri) => {
                context
            }
            Some(context) => {
                debug!(context_id = %context.id, "Code belongs to a different client or redirect URI");
                return Err(AuthError::ContextNotSetup);
            }
            None => return Err(AuthError::ContextNotSetup),
        };

        // 3. Resolve client
        let client = self.resolve_client(&request.client_id).await?;

        // 4. Authenticate client
        let authenticated = self
            .client_authenticator
            .authenticate(&client, &request.client_secret, &request.redirect_uri)
            .await?;
        if !authenticated {
            return Err(AuthError::client_authentication_failed(&request.client_id));
        }

        // 5. Verify PKCE if the authorization request carried a challenge
        if let Some(challenge) = context.pkce_challenge()? {
            let verifier = request
                .code_verifier
                .as_ref()
                .ok_or(AuthError::PkceVerificationFailed)?;
            challenge.verify(verifier)?;
        }

        // 6. Consume authorization code
        self.code_store.consume(&request.code).await?;

        // 7. Generate tokens
        let access_token = self.token_issuer.generate_access_token().await?;
        let refresh_token = self.token_issuer.generate_refresh_token().await?;

        info!(context_id = %context.id, expires_in = access_token.expires_in, "Tokens issued");

        let scope = context.scope.clone();
        Ok(TokenResponse {
            context,
            access_token: access_token.token,
            token_type: TokenType::Bearer,
            expires_in: access_token.expires_in,
            refresh_token: refresh_token.token,
            scope,
        })
    }

    /// Looks up an active client; inactive registrations count as absent.
    async fn resolve_client(&self, client_id: &str) -> AuthResult<Client> {
        self.client_registry
            .find_by_client_id(client_id)
            .await?
            .filter(|client| client.active)
            .ok_or_else(|| AuthError::client_not_registered(client_id))
    }
}

#[async_trait]
impl Grant for AuthorizationCodeGrant {
    type Request = GrantRequest;
    type Response = GrantResponse;

    async fn flow(&self, request: GrantRequest) -> AuthResult<GrantResponse> {
        match request {
            GrantRequest::Authorization(request) => {
                self.authorize(request).await.map(GrantResponse::Authorization)
            }
            GrantRequest::Token(request) => self.exchange(request).await.map(GrantResponse::Token),
        }
    }
}
