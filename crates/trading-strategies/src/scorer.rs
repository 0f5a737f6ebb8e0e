//! Weighted-vote rule scorer.
//!
//! RSI, MACD histogram and EMA crossover each cast one weighted vote. The
//! side whose summed weight beats the other side and exceeds 1.0 wins, with
//! the summed weight as its confidence.

use serde::{Deserialize, Serialize};
use tracing::warn;
use trading_core::{
    error::SignalError,
    types::{Action, Signal, SignalSource},
};
use trading_indicators::IndicatorSnapshot;

use crate::EntryMode;

const RSI_WEIGHT: f64 = 0.8;
const RSI_NEUTRAL_WEIGHT: f64 = 0.3;
const MACD_WEIGHT: f64 = 0.6;
const EMA_WEIGHT: f64 = 0.7;
/// A side needs more than this summed weight to win.
const MIN_SCORE: f64 = 1.0;
/// Confidence of a HOLD reached by weighing votes.
const UNDECIDED_CONFIDENCE: f64 = 0.5;

/// Signal thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// RSI below this votes LONG
    pub rsi_oversold: f64,
    /// RSI above this votes SHORT
    pub rsi_overbought: f64,
    /// Minimum confidence for an entry
    pub confidence_threshold: f64,
    /// Ask the chat backend before the rule base
    pub use_llm: bool,
    pub entry_mode: EntryMode,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            confidence_threshold: 0.7,
            use_llm: true,
            entry_mode: EntryMode::Signal,
        }
    }
}

impl ScorerConfig {
    pub fn validate(&self) -> Result<(), SignalError> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.rsi_oversold) || !in_range(self.rsi_overbought) {
            return Err(SignalError::InvalidConfig(
                "RSI thresholds must be between 0 and 100".into(),
            ));
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(SignalError::InvalidConfig(
                "Overbought must be greater than oversold".into(),
            ));
        }
        if !self.confidence_threshold.is_finite() || self.confidence_threshold < 0.0 {
            return Err(SignalError::InvalidConfig(format!(
                "confidence_threshold must be non-negative, got {}",
                self.confidence_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Vote {
    action: Action,
    weight: f64,
    reason: &'static str,
}

impl Vote {
    fn new(action: Action, weight: f64, reason: &'static str) -> Self {
        Self {
            action,
            weight,
            reason,
        }
    }
}

/// Deterministic scorer over an [`IndicatorSnapshot`].
#[derive(Debug, Clone)]
pub struct RuleScorer {
    config: ScorerConfig,
}

impl RuleScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Score a snapshot. Failures become a zero-confidence HOLD.
    pub fn score(&self, snapshot: &IndicatorSnapshot) -> Signal {
        match self.try_score(snapshot) {
            Ok(signal) => signal,
            Err(e) => {
                warn!(error = %e, "Scoring failed");
                Signal::no_signal(e.to_string())
            }
        }
    }

    /// Score a snapshot, reporting a missing price as an error.
    pub fn try_score(&self, snapshot: &IndicatorSnapshot) -> Result<Signal, SignalError> {
        if !snapshot.close.is_finite() {
            return Err(SignalError::MissingPrice);
        }

        let votes = self.votes(snapshot);
        if votes.is_empty() {
            return Ok(Signal::new(
                Action::Hold,
                0.0,
                "insufficient data",
                SignalSource::Rules,
            ));
        }

        let long_score = Self::total(&votes, Action::Long);
        let short_score = Self::total(&votes, Action::Short);

        let signal = if long_score > short_score && long_score > MIN_SCORE {
            Signal::new(
                Action::Long,
                long_score,
                Self::reasons(&votes, Action::Long),
                SignalSource::Rules,
            )
        } else if short_score > long_score && short_score > MIN_SCORE {
            Signal::new(
                Action::Short,
                short_score,
                Self::reasons(&votes, Action::Short),
                SignalSource::Rules,
            )
        } else {
            Signal::new(
                Action::Hold,
                UNDECIDED_CONFIDENCE,
                "conflicting or weak signals",
                SignalSource::Rules,
            )
        };

        Ok(signal)
    }

    fn votes(&self, snapshot: &IndicatorSnapshot) -> Vec<Vote> {
        let mut votes = Vec::with_capacity(3);

        if let Some(rsi) = snapshot.rsi.filter(|v| v.is_finite()) {
            votes.push(if rsi < self.config.rsi_oversold {
                Vote::new(Action::Long, RSI_WEIGHT, "RSI oversold")
            } else if rsi > self.config.rsi_overbought {
                Vote::new(Action::Short, RSI_WEIGHT, "RSI overbought")
            } else {
                Vote::new(Action::Hold, RSI_NEUTRAL_WEIGHT, "RSI neutral")
            });
        }

        if let Some(histogram) = snapshot.macd_histogram().filter(|v| v.is_finite()) {
            votes.push(if histogram > 0.0 {
                Vote::new(Action::Long, MACD_WEIGHT, "MACD positive")
            } else {
                Vote::new(Action::Short, MACD_WEIGHT, "MACD negative")
            });
        }

        if let (Some(short), Some(long)) = (snapshot.ema_short, snapshot.ema_long) {
            if short.is_finite() && long.is_finite() {
                votes.push(if short > long {
                    Vote::new(Action::Long, EMA_WEIGHT, "EMA bullish crossover")
                } else {
                    Vote::new(Action::Short, EMA_WEIGHT, "EMA bearish crossover")
                });
            }
        }

        votes
    }

    fn total(votes: &[Vote], action: Action) -> f64 {
        votes
            .iter()
            .filter(|v| v.action == action)
            .map(|v| v.weight)
            .sum()
    }

    fn reasons(votes: &[Vote], action: Action) -> String {
        votes
            .iter()
            .filter(|v| v.action == action)
            .map(|v| v.reason)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for RuleScorer {
    fn default() -> Self {
        Self::new(ScorerConfig::default())
    }
}
