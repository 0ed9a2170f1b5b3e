use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "grantflow")]
#[command(about = "grantflow CLI: check configuration and exercise the authorization code grant")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = "GRANTFLOW_CONFIG", default_value = "grantflow.toml")]
    pub config: PathBuf,

    /// Log level or filter (overrides [logging] level; RUST_LOG wins over both)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the configuration file and list registered clients
    CheckConfig,
    /// Hash a client secret for the [[clients]] table
    HashSecret(HashSecretArgs),
    /// Run one authorization request and token exchange against in-memory stores
    Demo(DemoArgs),
}

#[derive(clap::Args)]
pub struct HashSecretArgs {
    /// Plaintext secret to hash
    #[arg(conflicts_with = "generate", required_unless_present = "generate")]
    pub secret: Option<String>,
    /// Generate a new random secret instead
    #[arg(long)]
    pub generate: bool,
}

#[derive(clap::Args)]
pub struct DemoArgs {
    /// Client identifier
    #[arg(long)]
    pub client_id: String,
    /// Client secret (plaintext)
    #[arg(long, env = "GRANTFLOW_CLIENT_SECRET")]
    pub client_secret: String,
    /// Redirect URI (defaults to the client's only registered URI)
    #[arg(long)]
    pub redirect_uri: Option<String>,
    /// Requested scope
    #[arg(long)]
    pub scope: Option<String>,
    /// Opaque state echoed back with the code
    #[arg(long)]
    pub state: Option<String>,
    /// Attach a freshly generated PKCE challenge
    #[arg(long)]
    pub pkce: bool,
    /// Redeem the code a second time to show replay rejection
    #[arg(long)]
    pub replay: bool,
}
