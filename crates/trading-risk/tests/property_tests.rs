//! Property tests for the risk calculator.
//!
//! 1. Repeated calls with the same input give identical parameters
//! 2. Directional entries with non-zero ATR have a 2:1 reward/risk
//! 3. HOLD is always the neutral parameter set

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trading_core::types::{Action, Bar, BarSeries};
use trading_risk::{RiskCalculator, RiskConfig, RiskParameters};

/// Cent-grid candles: (close, spread) pairs in cents.
fn arb_series() -> impl Strategy<Value = BarSeries> {
    prop::collection::vec((100u32..100_000, 0u32..100), 1..60).prop_map(|rows| {
        let bars = rows.into_iter().enumerate().map(|(i, (close, spread))| {
            let close = f64::from(close) / 100.0;
            let spread = f64::from(spread) / 100.0;
            Bar::new(i as i64 * 60_000, close, close + spread, close - spread, close, 10.0)
        });
        BarSeries::from_bars("BTC/USDT", bars).unwrap()
    })
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![Just(Action::Long), Just(Action::Short), Just(Action::Hold)]
}

fn calculator() -> RiskCalculator {
    RiskCalculator::new(RiskConfig::default()).unwrap()
}

proptest! {
    #[test]
    fn compute_risk_is_deterministic(series in arb_series(), action in arb_action()) {
        let calc = calculator();
        prop_assert_eq!(calc.compute_risk(&series, action), calc.compute_risk(&series, action));
        prop_assert_eq!(
            calc.try_compute_risk(&series, action).ok(),
            calc.try_compute_risk(&series, action).ok()
        );
    }

    #[test]
    fn reward_is_twice_risk(
        series in arb_series(),
        action in prop_oneof![Just(Action::Long), Just(Action::Short)],
    ) {
        let params = calculator().try_compute_risk(&series, action).unwrap();
        if params.atr > Decimal::ZERO {
            prop_assert_eq!(params.risk_reward_ratio, dec!(2));
        } else {
            prop_assert_eq!(params.risk_reward_ratio, Decimal::ZERO);
        }
        prop_assert!(params.position_size > Decimal::ZERO);
    }

    #[test]
    fn hold_is_neutral(series in arb_series()) {
        prop_assert_eq!(
            calculator().compute_risk(&series, Action::Hold),
            RiskParameters::neutral(dec!(100))
        );
    }
}
