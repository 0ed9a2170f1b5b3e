use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use grantflow_auth::oauth::{PkceChallenge, PkceVerifier};
use grantflow_auth::{
    AuthorizationCodeGrant, AuthorizationRequest, OpaqueTokenIssuer, SecretClientAuthenticator,
    TokenRequest,
};
use grantflow_auth_memory::MemoryStores;

use crate::cli::DemoArgs;
use crate::config::FileConfig;
use crate::output::{print_field, print_json, print_success};

pub fn build_grant(cfg: FileConfig) -> Result<AuthorizationCodeGrant> {
    let stores = MemoryStores::new(&cfg.grant);
    for client in cfg.clients {
        let client_id = client.client_id.clone();
        stores
            .clients
            .register(client)
            .with_context(|| format!("Cannot register client '{client_id}'"))?;
    }

    tracing::debug!(clients = stores.clients.len(), "In-memory stores ready");

    let token_issuer = Arc::new(OpaqueTokenIssuer::new(&cfg.grant));
    Ok(stores.into_grant(
        Arc::new(SecretClientAuthenticator::new()),
        token_issuer,
        cfg.grant,
    ))
}

pub async fn run(cfg: FileConfig, args: &DemoArgs) -> Result<()> {
    if cfg.find_client(&args.client_id).is_none() {
        anyhow::bail!(
            "Client '{}' is not listed in [[clients]]",
            args.client_id
        );
    }
    let grant = build_grant(cfg)?;

    let mut request = AuthorizationRequest::new(&args.client_id);
    if let Some(uri) = &args.redirect_uri {
        request = request.with_redirect_uri(uri);
    }
    if let Some(scope) = &args.scope {
        request = request.with_scope(scope);
    }
    if let Some(state) = &args.state {
        request = request.with_state(state);
    }
    let verifier = args.pkce.then(PkceVerifier::generate);
    if let Some(verifier) = &verifier {
        request = request.with_pkce(&PkceChallenge::from_verifier(verifier));
    }

    println!("{}", "Authorization request".bold());
    let authorization = grant
        .authorize(request)
        .await
        .context("Authorization request failed")?;
    print_field(
        "Redirect",
        &authorization
            .to_redirect_url()
            .context("Registered redirect URI is not a valid URL")?,
    );

    let mut token_request = TokenRequest::new(
        &args.client_id,
        &args.client_secret,
        &authorization.redirect_uri,
        &authorization.code,
    );
    if let Some(verifier) = &verifier {
        token_request = token_request.with_code_verifier(verifier.as_str());
    }

    println!("{}", "Token request".bold());
    let tokens = grant
        .exchange(token_request.clone())
        .await
        .context("Token request failed")?;
    print_json(&tokens)?;

    if args.replay {
        println!("{}", "Replaying token request".bold());
        match grant.exchange(token_request).await {
            Ok(_) => anyhow::bail!("Replayed authorization code was accepted"),
            Err(e) => print_field("Rejected", &format!("{} ({})", e, e.oauth_error_code())),
        }
    }

    print_success("Authorization code grant completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grantflow_auth::Client;
    use grantflow_auth::secret::hash_client_secret;

    fn config() -> FileConfig {
        FileConfig {
            clients: vec![
                Client::new("c1", "Test App", vec!["https://app/cb".to_string()])
                    .with_secret_hash(hash_client_secret("s1").unwrap()),
            ],
            ..FileConfig::default()
        }
    }

    fn args(secret: &str) -> DemoArgs {
        DemoArgs {
            client_id: "c1".to_string(),
            client_secret: secret.to_string(),
            redirect_uri: None,
            scope: Some("read".to_string()),
            state: Some("xyz".to_string()),
            pkce: true,
            replay: true,
        }
    }

    #[tokio::test]
    async fn test_demo_succeeds() {
        run(config(), &args("s1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_demo_wrong_secret_fails() {
        let err = run(config(), &args("wrong")).await.unwrap_err();
        assert!(err.to_string().contains("Token request failed"));
    }

    #[tokio::test]
    async fn test_demo_unknown_client_fails() {
        let mut args = args("s1");
        args.client_id = "c2".to_string();
        let err = run(config(), &args).await.unwrap_err();
        assert!(err.to_string().contains("not listed"));
    }
}
