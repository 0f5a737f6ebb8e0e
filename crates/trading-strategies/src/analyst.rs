//! Chart analyst: chat backend first, rule base as fallback.

use std::sync::Arc;

use tracing::{debug, warn};
use trading_core::{
    error::{LlmError, SignalError},
    types::{Signal, SignalSource},
};
use trading_indicators::IndicatorSnapshot;
use trading_llm::{build_messages, parse_reply, ChatBackend};

use crate::RuleScorer;

/// Produces a signal for one pair from its latest indicators.
#[derive(Clone)]
pub struct ChartAnalyst {
    scorer: RuleScorer,
    backend: Option<Arc<dyn ChatBackend>>,
    use_fallback: bool,
}

impl ChartAnalyst {
    /// An analyst that only uses the rule base.
    pub fn rules_only(scorer: RuleScorer) -> Self {
        Self {
            scorer,
            backend: None,
            use_fallback: true,
        }
    }

    /// An analyst that asks `backend` first.
    ///
    /// With `use_fallback` unset, a backend failure is returned as
    /// [`SignalError::Unavailable`] instead of being scored by the rules.
    /// Running out of credits and empty replies are always scored by the
    /// rules.
    pub fn with_backend(
        scorer: RuleScorer,
        backend: Arc<dyn ChatBackend>,
        use_fallback: bool,
    ) -> Self {
        Self {
            scorer,
            backend: Some(backend),
            use_fallback,
        }
    }

    pub fn scorer(&self) -> &RuleScorer {
        &self.scorer
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Analyse a snapshot for `pair`.
    pub async fn analyze(
        &self,
        snapshot: &IndicatorSnapshot,
        pair: &str,
    ) -> Result<Signal, SignalError> {
        let Some(backend) = &self.backend else {
            return self.scorer.try_score(snapshot);
        };

        let messages = build_messages(snapshot, pair);
        match backend.complete(&messages).await {
            Ok(reply) => {
                debug!(pair, backend = backend.name(), "Chat backend replied");
                Ok(parse_reply(&reply))
            }
            Err(e) if self.use_fallback || always_falls_back(&e) => {
                warn!(
                    pair,
                    backend = backend.name(),
                    error = %e,
                    "Chat backend failed, scoring with rules"
                );
                let mut signal = self.scorer.try_score(snapshot)?;
                signal.source = SignalSource::RuleFallback;
                Ok(signal)
            }
            Err(e) => Err(SignalError::Unavailable(e.to_string())),
        }
    }
}

/// Failures that fall back to the rules whatever `use_fallback` says.
fn always_falls_back(error: &LlmError) -> bool {
    matches!(error, LlmError::PaymentRequired | LlmError::EmptyResponse)
}

impl std::fmt::Debug for ChartAnalyst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartAnalyst")
            .field("scorer", &self.scorer)
            .field("backend", &self.backend.as_ref().map(|b| b.name().to_string()))
            .field("use_fallback", &self.use_fallback)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trading_core::types::{Action, Bar};
    use trading_indicators::MacdOutput;
    use trading_llm::ScriptedBackend;

    fn bullish() -> IndicatorSnapshot {
        let mut snapshot = IndicatorSnapshot::bare(&Bar::new(0, 100.0, 101.0, 99.0, 100.0, 10.0));
        snapshot.rsi = Some(25.0);
        snapshot.macd = Some(MacdOutput {
            macd: 0.5,
            signal: 0.0,
            histogram: 0.5,
        });
        snapshot.ema_short = Some(101.0);
        snapshot.ema_long = Some(100.0);
        snapshot
    }

    #[tokio::test]
    async fn test_rules_only() {
        let analyst = ChartAnalyst::rules_only(RuleScorer::default());
        let signal = analyst.analyze(&bullish(), "BTC/USDT").await.unwrap();

        assert_eq!(signal.action, Action::Long);
        assert_eq!(signal.source, SignalSource::Rules);
    }

    #[tokio::test]
    async fn test_backend_reply_is_parsed() {
        let backend = Arc::new(ScriptedBackend::new().with_reply("SHORT - Confidence: 0.9"));
        let analyst = ChartAnalyst::with_backend(RuleScorer::default(), backend.clone(), true);

        let signal = analyst.analyze(&bullish(), "BTC/USDT").await.unwrap();

        assert_eq!(signal.action, Action::Short);
        assert!((signal.confidence - 0.9).abs() < 1e-9);
        assert_eq!(signal.source, SignalSource::Llm);

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0][1].content.contains("BTC/USDT"));
    }

    #[tokio::test]
    async fn test_payment_required_falls_back() {
        let backend = Arc::new(ScriptedBackend::new().with_error(LlmError::PaymentRequired));
        let analyst = ChartAnalyst::with_backend(RuleScorer::default(), backend, true);

        let signal = analyst.analyze(&bullish(), "BTC/USDT").await.unwrap();

        assert_eq!(signal.action, Action::Long);
        assert!((signal.confidence - 2.1).abs() < 1e-9);
        assert_eq!(signal.source, SignalSource::RuleFallback);
    }

    #[tokio::test]
    async fn test_failure_without_fallback() {
        let backend = Arc::new(ScriptedBackend::new().with_error(LlmError::Timeout(30)));
        let analyst = ChartAnalyst::with_backend(RuleScorer::default(), backend, false);

        let result = analyst.analyze(&bullish(), "BTC/USDT").await;
        assert!(matches!(result, Err(SignalError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_credits_and_empty_reply_fall_back_without_flag() {
        for error in [LlmError::PaymentRequired, LlmError::EmptyResponse] {
            let backend = Arc::new(ScriptedBackend::new().with_error(error));
            let analyst = ChartAnalyst::with_backend(RuleScorer::default(), backend, false);

            let signal = analyst.analyze(&bullish(), "BTC/USDT").await.unwrap();
            assert_eq!(signal.action, Action::Long);
            assert_eq!(signal.source, SignalSource::RuleFallback);
        }
    }
}
