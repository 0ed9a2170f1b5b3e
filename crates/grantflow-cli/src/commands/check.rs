use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::config::FileConfig;
use crate::output::{print_field, print_success};

pub fn check_config(path: &Path, cfg: &FileConfig) -> Result<()> {
    let grant = &cfg.grant;
    print_field("Config", &path.display().to_string());
    print_field(
        "Code lifetime",
        &format!("{}s", grant.authorization_code_lifetime.as_secs()),
    );
    print_field(
        "Context lifetime",
        &format!("{}s", grant.context_lifetime.as_secs()),
    );
    print_field(
        "Access token lifetime",
        &format!("{}s", grant.access_token_lifetime.as_secs()),
    );
    print_field(
        "Refresh token lifetime",
        &format!("{}s", grant.refresh_token_lifetime.as_secs()),
    );
    print_field("Require PKCE", &grant.require_pkce.to_string());

    if cfg.clients.is_empty() {
        println!("{}", "No clients registered.".yellow());
    }
    for client in &cfg.clients {
        let status = if client.active {
            "active".green()
        } else {
            "inactive".red()
        };
        println!(
            "  {} ({}) [{}] {}",
            client.client_id.cyan(),
            client.name,
            status,
            client.redirect_uris.join(", ")
        );
    }

    print_success(&format!(
        "Configuration is valid ({} client(s))",
        cfg.clients.len()
    ));
    Ok(())
}
