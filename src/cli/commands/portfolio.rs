//! Portfolio command implementation.

use anyhow::{Context, Result};
use trading_config::AppConfig;
use trading_risk::RiskCalculator;

use crate::cli::{OutputFormat, PortfolioArgs};

pub fn run(args: PortfolioArgs, config: &AppConfig) -> Result<()> {
    let calculator = RiskCalculator::new(config.risk.clone()).context("Invalid risk settings")?;
    let status = calculator.check_portfolio(args.open_trades, args.exposure);

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Text => {
            println!("Open trades:   {} / {}", status.open_trades, config.risk.max_open_trades);
            println!("Exposure:      {:.2}", status.total_exposure);
            println!("Risk score:    {:.3}", status.risk_score);
            println!("Risk level:    {}", status.risk_level);
            println!("Can open new:  {}", status.can_open_new_trade);
            for warning in &status.warnings {
                println!("  ! {}", warning);
            }
        }
    }

    Ok(())
}
