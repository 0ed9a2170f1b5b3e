use anyhow::{Context, Result};
use colored::Colorize;
use grantflow_auth::secret::{generate_client_secret, hash_client_secret};

use crate::cli::HashSecretArgs;
use crate::output::{print_field, print_success};

pub fn hash(args: &HashSecretArgs) -> Result<()> {
    let (secret, generated) = match &args.secret {
        Some(secret) if !args.generate => (secret.clone(), false),
        _ => (generate_client_secret(), true),
    };

    let hash = hash_client_secret(&secret)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("Failed to hash client secret")?;

    if generated {
        print_field("Secret", &secret.yellow().to_string());
        println!("{}", "Store this secret now; it cannot be recovered.".dimmed());
    }
    print_field("clientSecret", &hash);
    print_success("Paste the hash into the client's [[clients]] entry");
    Ok(())
}
