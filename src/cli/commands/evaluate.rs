//! Evaluate command implementation.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use trading_config::AppConfig;
use trading_data::load_csv;
use trading_llm::{ChatBackend, OpenRouterClient};
use trading_strategies::SquadStrategy;

use crate::cli::{EvaluateArgs, OutputFormat};

/// Chat backend for the analyst, when enabled and a key is available.
fn chat_backend(config: &AppConfig) -> Option<Arc<dyn ChatBackend>> {
    if !config.signals.use_llm {
        return None;
    }
    match OpenRouterClient::from_env(config.llm.clone()) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!(error = %e, "Chat backend unavailable, scoring with rules");
            None
        }
    }
}

pub async fn run(args: EvaluateArgs, config: &AppConfig) -> Result<()> {
    if !args.data.exists() {
        anyhow::bail!(
            "Data path '{}' does not exist. Provide a CSV file with --data",
            args.data.display()
        );
    }

    let series = load_csv(&args.data, &args.pair)
        .with_context(|| format!("Failed to load candles from {}", args.data.display()))?;
    info!(pair = %args.pair, bars = series.len(), "Evaluating");

    let strategy = SquadStrategy::new(config.squad(), chat_backend(config))
        .context("Failed to build strategy")?;

    let entry = strategy.entry_decision(&series).await;
    let risk = strategy.compute_risk(&series, entry.signal.action);
    let exit = strategy.snapshot(&series).map(|s| strategy.exit_decision(&s));
    let portfolio = strategy.check_portfolio(args.open_trades, args.exposure);

    match args.output {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "pair": args.pair,
                "signal": entry.signal,
                "entry": {
                    "enter_long": entry.enter_long,
                    "enter_short": entry.enter_short,
                },
                "exit": exit,
                "risk": risk,
                "portfolio": portfolio,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            let signal = &entry.signal;
            println!("Pair:        {}", args.pair);
            println!("Bars:        {}", series.len());
            println!("Action:      {}", signal.action);
            println!("Confidence:  {:.2}", signal.confidence);
            println!("Source:      {:?}", signal.source);
            println!("Reason:      {}", signal.reason);
            println!();
            println!("Enter long:  {}", entry.enter_long);
            println!("Enter short: {}", entry.enter_short);
            if let Some(exit) = &exit {
                println!("Exit long:   {}", exit.exit_long);
                println!("Exit short:  {}", exit.exit_short);
                for reason in &exit.reasons {
                    println!("  - {}", reason);
                }
            }
            println!();
            println!("Stop loss:   {}", risk.stop_loss.round_dp(8));
            println!("Take profit: {}", risk.take_profit.round_dp(8));
            println!("Size:        {}", risk.position_size.round_dp(8));
            println!("Risk/reward: {}", risk.risk_reward_ratio.round_dp(2));
            println!("ATR:         {}", risk.atr.round_dp(8));
            println!("Max risk:    {}", risk.max_risk_amount.round_dp(2));
            println!();
            println!("Can open:    {}", portfolio.can_open_new_trade);
            println!("Risk level:  {}", portfolio.risk_level);
            for warning in &portfolio.warnings {
                println!("  ! {}", warning);
            }
        }
    }

    Ok(())
}
