//! Classic Bollinger/volume entry rules and indicator exit rules.

use serde::{Deserialize, Serialize};
use trading_core::types::Action;
use trading_indicators::IndicatorSnapshot;

use crate::ScorerConfig;

/// How entries are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    /// Evaluated signal at or above the confidence threshold
    #[default]
    Signal,
    /// Mean-reversion rule: RSI extreme, MACD agreeing, close outside the
    /// bands and volume above its average
    Classic,
}

/// Classic mean-reversion entry.
///
/// LONG requires RSI below oversold, a positive MACD histogram, a close
/// below the lower band and above-average volume; SHORT is symmetric.
/// Any missing indicator means no entry.
pub fn classic_entry(snapshot: &IndicatorSnapshot, config: &ScorerConfig) -> Option<Action> {
    let rsi = snapshot.rsi?;
    let histogram = snapshot.macd_histogram()?;
    let bands = snapshot.bollinger?;
    if !snapshot.volume_above_average() {
        return None;
    }

    if rsi < config.rsi_oversold && histogram > 0.0 && bands.is_oversold(snapshot.close) {
        Some(Action::Long)
    } else if rsi > config.rsi_overbought
        && histogram < 0.0
        && bands.is_overbought(snapshot.close)
    {
        Some(Action::Short)
    } else {
        None
    }
}

/// Which open sides should be closed at this bar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitDecision {
    pub exit_long: bool,
    pub exit_short: bool,
    pub reasons: Vec<String>,
}

/// Exit rules: any single condition closes the side.
///
/// Longs exit on RSI above overbought, a negative histogram or a close
/// above the upper band; shorts on the mirror conditions.
pub fn exit_rules(snapshot: &IndicatorSnapshot, config: &ScorerConfig) -> ExitDecision {
    let mut decision = ExitDecision::default();
    let close = snapshot.close;

    if let Some(rsi) = snapshot.rsi {
        if rsi > config.rsi_overbought {
            decision.exit_long = true;
            decision.reasons.push(format!("RSI {:.2} above {}", rsi, config.rsi_overbought));
        }
        if rsi < config.rsi_oversold {
            decision.exit_short = true;
            decision.reasons.push(format!("RSI {:.2} below {}", rsi, config.rsi_oversold));
        }
    }

    if let Some(histogram) = snapshot.macd_histogram() {
        if histogram < 0.0 {
            decision.exit_long = true;
            decision.reasons.push("MACD histogram negative".to_string());
        } else if histogram > 0.0 {
            decision.exit_short = true;
            decision.reasons.push("MACD histogram positive".to_string());
        }
    }

    if let Some(bands) = snapshot.bollinger {
        if bands.is_overbought(close) {
            decision.exit_long = true;
            decision.reasons.push("Close above upper band".to_string());
        }
        if bands.is_oversold(close) {
            decision.exit_short = true;
            decision.reasons.push("Close below lower band".to_string());
        }
    }

    decision
}
