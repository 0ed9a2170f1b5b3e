mod cli;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::HashSecret(args) => {
            observability::init_tracing(cli.log_level.as_deref().unwrap_or("warn"));
            commands::secret::hash(args)?;
        }
        Commands::CheckConfig => {
            let cfg = config::load(&cli.config)?;
            observability::init_tracing(cli.log_level.as_deref().unwrap_or(&cfg.logging.level));
            commands::check::check_config(&cli.config, &cfg)?;
        }
        Commands::Demo(args) => {
            let cfg = config::load(&cli.config)?;
            observability::init_tracing(cli.log_level.as_deref().unwrap_or(&cfg.logging.level));
            commands::demo::run(cfg, args).await?;
        }
    }

    Ok(())
}
