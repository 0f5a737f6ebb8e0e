//! Host-facing strategy facade.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use trading_core::{
    error::{RiskError, SignalError, TradingResult},
    types::{Action, BarSeries, Signal, SignalSource},
};
use trading_indicators::{IndicatorConfig, IndicatorPreparer, IndicatorSnapshot};
use trading_llm::{ChatBackend, LlmConfig};
use trading_risk::{PortfolioStatus, RiskCalculator, RiskConfig, RiskParameters};

use crate::{
    classic_entry, exit_rules, ChartAnalyst, EntryMode, ExitDecision, RuleScorer, ScorerConfig,
};

/// Configuration for every component the strategy drives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SquadConfig {
    pub indicators: IndicatorConfig,
    pub signals: ScorerConfig,
    pub risk: RiskConfig,
    pub llm: LlmConfig,
}

/// Entry flags for the latest bar and the signal behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDecision {
    pub enter_long: bool,
    pub enter_short: bool,
    pub signal: Signal,
}

impl EntryDecision {
    fn from_action(action: Option<Action>, signal: Signal) -> Self {
        Self {
            enter_long: action == Some(Action::Long),
            enter_short: action == Some(Action::Short),
            signal,
        }
    }
}

/// Indicators, signal, risk and portfolio checks for one host.
#[derive(Debug)]
pub struct SquadStrategy {
    preparer: IndicatorPreparer,
    analyst: ChartAnalyst,
    risk: RiskCalculator,
    signals: ScorerConfig,
}

impl SquadStrategy {
    /// Build the strategy. `backend` is consulted only when `use_llm` is set.
    pub fn new(config: SquadConfig, backend: Option<Arc<dyn ChatBackend>>) -> TradingResult<Self> {
        config.signals.validate()?;
        let preparer = IndicatorPreparer::new(config.indicators)?;
        let risk = RiskCalculator::new(config.risk)?;

        let scorer = RuleScorer::new(config.signals.clone());
        let analyst = match backend {
            Some(backend) if config.signals.use_llm => {
                ChartAnalyst::with_backend(scorer, backend, config.llm.use_fallback)
            }
            _ => ChartAnalyst::rules_only(scorer),
        };

        Ok(Self {
            preparer,
            analyst,
            risk,
            signals: config.signals,
        })
    }

    pub fn preparer(&self) -> &IndicatorPreparer {
        &self.preparer
    }

    pub fn analyst(&self) -> &ChartAnalyst {
        &self.analyst
    }

    /// Latest indicator snapshot for `series`.
    pub fn snapshot(&self, series: &BarSeries) -> Option<IndicatorSnapshot> {
        self.preparer.snapshot(series)
    }

    /// Signal for the latest bar. Failures become a no-signal HOLD.
    pub async fn evaluate(&self, series: &BarSeries) -> Signal {
        match self.try_evaluate(series).await {
            Ok(signal) => {
                info!(
                    pair = %series.pair,
                    action = %signal.action,
                    confidence = signal.confidence,
                    source = ?signal.source,
                    "Signal produced"
                );
                signal
            }
            Err(e) => {
                warn!(pair = %series.pair, error = %e, "Evaluation failed");
                Signal::no_signal(e.to_string())
            }
        }
    }

    pub async fn try_evaluate(&self, series: &BarSeries) -> Result<Signal, SignalError> {
        if series.is_empty() {
            return Err(SignalError::InsufficientData {
                required: self.preparer.warmup_period(),
                available: 0,
            });
        }
        let snapshot = self.snapshot(series).ok_or(SignalError::MissingPrice)?;
        self.analyst.analyze(&snapshot, &series.pair).await
    }

    pub fn compute_risk(&self, series: &BarSeries, action: Action) -> RiskParameters {
        self.risk.compute_risk(series, action)
    }

    pub fn try_compute_risk(
        &self,
        series: &BarSeries,
        action: Action,
    ) -> Result<RiskParameters, RiskError> {
        self.risk.try_compute_risk(series, action)
    }

    pub fn check_portfolio(&self, open_trades: usize, total_exposure: Decimal) -> PortfolioStatus {
        self.risk.check_portfolio(open_trades, total_exposure)
    }

    /// Final gate before the host opens a trade.
    pub fn confirm_trade_entry(&self, open_trades: usize, total_exposure: Decimal) -> bool {
        let status = self.check_portfolio(open_trades, total_exposure);
        if !status.can_open_new_trade {
            info!(open_trades, risk_level = %status.risk_level, "Trade entry rejected");
        }
        status.can_open_new_trade
    }

    /// Entry flags for the latest bar of `series`.
    pub async fn entry_decision(&self, series: &BarSeries) -> EntryDecision {
        match self.signals.entry_mode {
            EntryMode::Signal => {
                let signal = self.evaluate(series).await;
                let action = (signal.action.is_directional()
                    && signal.confidence >= self.signals.confidence_threshold)
                    .then_some(signal.action);
                if let Some(action) = action {
                    info!(
                        pair = %series.pair,
                        action = %action,
                        reason = %signal.reason,
                        "Entry signal"
                    );
                }
                EntryDecision::from_action(action, signal)
            }
            EntryMode::Classic => {
                let action = self
                    .snapshot(series)
                    .and_then(|snapshot| classic_entry(&snapshot, &self.signals));
                let signal = match action {
                    Some(action) => Signal::new(
                        action,
                        1.0,
                        "classic mean-reversion entry",
                        SignalSource::Rules,
                    ),
                    None => Signal::no_signal("classic entry conditions not met"),
                };
                EntryDecision::from_action(action, signal)
            }
        }
    }

    pub fn exit_decision(&self, snapshot: &IndicatorSnapshot) -> ExitDecision {
        exit_rules(snapshot, &self.signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use trading_core::error::TradingError;
    use trading_core::types::Bar;
    use trading_llm::ScriptedBackend;

    fn series(len: usize) -> BarSeries {
        BarSeries::from_bars(
            "BTC/USDT",
            (0..len).map(|i| {
                let close = 100.0 + (i as f64 * 0.3).sin() * 3.0;
                Bar::new(i as i64 * 60_000, close, close + 1.0, close - 1.0, close, 10.0)
            }),
        )
        .unwrap()
    }

    fn rules_only() -> SquadStrategy {
        let config = SquadConfig {
            signals: ScorerConfig {
                use_llm: false,
                ..Default::default()
            },
            ..Default::default()
        };
        SquadStrategy::new(config, None).unwrap()
    }

    fn with_reply(reply: &str) -> SquadStrategy {
        let backend = Arc::new(ScriptedBackend::new().with_reply(reply));
        SquadStrategy::new(SquadConfig::default(), Some(backend)).unwrap()
    }

    #[tokio::test]
    async fn test_empty_series_is_no_signal() {
        let strategy = rules_only();
        let empty = BarSeries::new("BTC/USDT");

        assert!(matches!(
            strategy.try_evaluate(&empty).await,
            Err(SignalError::InsufficientData { available: 0, .. })
        ));

        let signal = strategy.evaluate(&empty).await;
        assert_eq!(signal.action, Action::Hold);
        assert_eq!(signal.confidence, 0.0);
        assert_eq!(signal.source, SignalSource::NoSignal);
    }

    #[tokio::test]
    async fn test_short_history_is_insufficient() {
        let signal = rules_only().evaluate(&series(5)).await;

        assert_eq!(signal.action, Action::Hold);
        assert_eq!(signal.confidence, 0.0);
        assert_eq!(signal.reason, "insufficient data");
    }

    #[tokio::test]
    async fn test_evaluate_is_repeatable() {
        let strategy = rules_only();
        let data = series(80);

        assert_eq!(strategy.evaluate(&data).await, strategy.evaluate(&data).await);
    }

    #[tokio::test]
    async fn test_confident_backend_enters() {
        let decision = with_reply("LONG. Confidence: 0.9").entry_decision(&series(60)).await;

        assert!(decision.enter_long);
        assert!(!decision.enter_short);
        assert_eq!(decision.signal.source, SignalSource::Llm);
    }

    #[tokio::test]
    async fn test_weak_backend_does_not_enter() {
        let decision = with_reply("SHORT, confidence: 0.5").entry_decision(&series(60)).await;

        assert!(!decision.enter_long);
        assert!(!decision.enter_short);
        assert_eq!(decision.signal.action, Action::Short);
    }

    #[tokio::test]
    async fn test_backend_ignored_when_disabled() {
        let backend = Arc::new(ScriptedBackend::new().with_reply("LONG"));
        let config = SquadConfig {
            signals: ScorerConfig {
                use_llm: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let strategy = SquadStrategy::new(config, Some(backend.clone())).unwrap();

        let signal = strategy.evaluate(&series(60)).await;
        assert_ne!(signal.source, SignalSource::Llm);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_classic_mode_without_conditions() {
        let config = SquadConfig {
            signals: ScorerConfig {
                use_llm: false,
                entry_mode: EntryMode::Classic,
                ..Default::default()
            },
            ..Default::default()
        };
        let strategy = SquadStrategy::new(config, None).unwrap();

        // Constant volume never beats its own average
        let decision = strategy.entry_decision(&series(60)).await;
        assert!(!decision.enter_long && !decision.enter_short);
        assert!(decision.signal.is_hold());
    }

    #[test]
    fn test_risk_and_portfolio() {
        let strategy = rules_only();
        let flat = BarSeries::from_bars(
            "BTC/USDT",
            (0..20).map(|i| Bar::new(i * 60_000, 100.0, 101.0, 99.0, 100.0, 10.0)),
        )
        .unwrap();

        let params = strategy.compute_risk(&flat, Action::Long);
        assert_eq!(params.stop_loss, dec!(97));
        assert_eq!(params.take_profit, dec!(106));

        let hold = strategy.compute_risk(&flat, Action::Hold);
        assert_eq!(hold.stop_loss, Decimal::ZERO);

        assert!(strategy.confirm_trade_entry(0, Decimal::ZERO));
        assert!(!strategy.confirm_trade_entry(3, dec!(300)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SquadConfig {
            signals: ScorerConfig {
                rsi_oversold: 90.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            SquadStrategy::new(config, None),
            Err(TradingError::Signal(_))
        ));
    }
}
