//! Indicators command implementation.

use anyhow::{Context, Result};
use trading_config::AppConfig;
use trading_data::load_csv;
use trading_indicators::IndicatorPreparer;

use crate::cli::{IndicatorsArgs, OutputFormat};

fn show(label: &str, value: Option<f64>) {
    match value {
        Some(v) => println!("{:<16}{:.4}", label, v),
        None => println!("{:<16}-", label),
    }
}

pub fn run(args: IndicatorsArgs, config: &AppConfig) -> Result<()> {
    let series = load_csv(&args.data, &args.pair)
        .with_context(|| format!("Failed to load candles from {}", args.data.display()))?;
    let preparer =
        IndicatorPreparer::new(config.indicators.clone()).context("Invalid indicator settings")?;

    let snapshot = preparer
        .snapshot(&series)
        .context("No candles to compute indicators from")?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => {
            println!("{} @ {}", args.pair, series.last().map(|b| b.datetime()).unwrap_or_default());
            if series.len() < preparer.warmup_period() {
                println!(
                    "(only {} of {} warm-up bars, some values are missing)",
                    series.len(),
                    preparer.warmup_period()
                );
            }
            show("Close", Some(snapshot.close));
            show("RSI", snapshot.rsi);
            show("MACD", snapshot.macd.map(|m| m.macd));
            show("MACD signal", snapshot.macd.map(|m| m.signal));
            show("MACD hist", snapshot.macd_histogram());
            show("EMA short", snapshot.ema_short);
            show("EMA long", snapshot.ema_long);
            show("BB upper", snapshot.bollinger.map(|b| b.upper));
            show("BB middle", snapshot.bollinger.map(|b| b.middle));
            show("BB lower", snapshot.bollinger.map(|b| b.lower));
            show("Volume", Some(snapshot.volume));
            show("Volume SMA", snapshot.volume_sma);
            show("ATR", snapshot.atr);
            show("Stoch %K", snapshot.stochastic.map(|s| s.k));
            show("Stoch %D", snapshot.stochastic.map(|s| s.d));
        }
    }

    Ok(())
}
