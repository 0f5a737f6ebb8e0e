//! Signal engine CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use trading_config::{load_config, LogFormat};
use trading_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(level) = cli.log_level {
        config.logging.level = level.as_str().to_string();
    }
    if cli.json_logs {
        config.logging.format = LogFormat::Json;
    }
    let _log_guard = setup_logging(&config.logging);

    match cli.command {
        Commands::Evaluate(args) => cli::commands::evaluate::run(args, &config).await,
        Commands::Indicators(args) => cli::commands::indicators::run(args, &config),
        Commands::Portfolio(args) => cli::commands::portfolio::run(args, &config),
        Commands::ValidateConfig => cli::commands::validate::run(cli.config.as_deref(), &config),
    }
}
