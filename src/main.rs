//! Parley - login-gated web chat front-end
//!
#![doc = "Parley - login-gated web chat front-end"]
#![doc = "Main entry point for the Parley application."]

use anyhow::Result;

use parley::cli::{Cli, Commands};
use parley::commands;
use parley::config::{self, Config, Secrets};
use parley::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json_logs)?;

    // Pick up PARLEY_* and secrets from .env before reading the environment
    config::load_dotenv();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Serve { open, .. } => {
            tracing::info!("Starting web UI");
            let secrets = Secrets::from_env(&config)?;

            if let Some(url) = config.database.url.as_deref() {
                parley::db::probe(url).await?;
            }

            commands::serve::run_serve(config, secrets, open).await?;
            Ok(())
        }
        Commands::Ask { question } => {
            tracing::info!("Asking a single question");
            let secrets = Secrets::from_env(&config)?;
            commands::ask::run_ask(config, secrets, question).await?;
            Ok(())
        }
        Commands::CheckDb => {
            tracing::info!("Probing database");
            commands::check_db::run_check_db(&config).await?;
            Ok(())
        }
    }
}
