//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use trading_config::{AppConfig, DEFAULT_CONFIG_PATH};

pub fn run(config_path: Option<&Path>, config: &AppConfig) -> Result<()> {
    let shown = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    println!("Validating configuration: {}", shown.display());

    match config.validate() {
        Ok(()) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            let backend = if config.signals.use_llm {
                config.llm.model.as_str()
            } else {
                "disabled"
            };
            println!("Chat backend: {}", backend);
            println!("Entry mode: {:?}", config.signals.entry_mode);
            println!("Confidence threshold: {}", config.signals.confidence_threshold);
            println!("Max open trades: {}", config.risk.max_open_trades);
            println!("Stake amount: {}", config.risk.stake_amount);
            println!("Stop-loss risk: {}%", config.risk.stop_loss_percent);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
