//! ATR-based stop-loss and take-profit levels.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use trading_core::error::RiskError;
use trading_core::types::Action;

/// Stop-loss and take-profit prices for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectiveLevels {
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
}

impl ProtectiveLevels {
    /// Reward distance over risk distance, measured from `price`.
    ///
    /// Zero when the stop sits on the entry price.
    pub fn risk_reward_ratio(&self, price: Decimal) -> Result<Decimal, RiskError> {
        let distance = |level: Decimal| {
            level
                .checked_sub(price)
                .map(|d| d.abs())
                .ok_or(RiskError::Overflow("risk/reward distance"))
        };
        let risk = distance(self.stop_loss)?;
        if risk.is_zero() {
            return Ok(Decimal::ZERO);
        }
        distance(self.take_profit)?
            .checked_div(risk)
            .ok_or(RiskError::Overflow("risk/reward ratio"))
    }
}

/// Places stops a multiple of ATR away from the entry price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtrStops {
    pub stop_multiplier: Decimal,
    pub take_profit_multiplier: Decimal,
}

impl Default for AtrStops {
    fn default() -> Self {
        Self {
            stop_multiplier: dec!(1.5),
            take_profit_multiplier: dec!(3.0),
        }
    }
}

impl AtrStops {
    /// Levels for a new position, or `None` for HOLD.
    ///
    /// Fails with [`RiskError::Overflow`] when a level leaves the decimal range.
    pub fn levels(
        &self,
        price: Decimal,
        atr: Decimal,
        action: Action,
    ) -> Result<Option<ProtectiveLevels>, RiskError> {
        let overflow = || RiskError::Overflow("protective levels");
        let stop_offset = atr.checked_mul(self.stop_multiplier).ok_or_else(overflow)?;
        let target_offset = atr
            .checked_mul(self.take_profit_multiplier)
            .ok_or_else(overflow)?;

        let (stop_loss, take_profit) = match action {
            // Long: stop below
            Action::Long => (
                price.checked_sub(stop_offset),
                price.checked_add(target_offset),
            ),
            // Short: stop above
            Action::Short => (
                price.checked_add(stop_offset),
                price.checked_sub(target_offset),
            ),
            Action::Hold => return Ok(None),
        };

        Ok(Some(ProtectiveLevels {
            stop_loss: stop_loss.ok_or_else(overflow)?,
            take_profit: take_profit.ok_or_else(overflow)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_levels() {
        let stops = AtrStops::default();
        let levels = stops.levels(dec!(100), dec!(2), Action::Long).unwrap().unwrap();

        assert_eq!(levels.stop_loss, dec!(97));
        assert_eq!(levels.take_profit, dec!(106));
        assert_eq!(levels.risk_reward_ratio(dec!(100)).unwrap(), dec!(2));
    }

    #[test]
    fn test_short_levels() {
        let stops = AtrStops::default();
        let levels = stops.levels(dec!(100), dec!(2), Action::Short).unwrap().unwrap();

        assert_eq!(levels.stop_loss, dec!(103));
        assert_eq!(levels.take_profit, dec!(94));
        assert_eq!(levels.risk_reward_ratio(dec!(100)).unwrap(), dec!(2));
    }

    #[test]
    fn test_hold_has_no_levels() {
        assert!(AtrStops::default()
            .levels(dec!(100), dec!(2), Action::Hold)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_zero_atr_ratio_is_zero() {
        let levels = AtrStops::default()
            .levels(dec!(100), Decimal::ZERO, Action::Long)
            .unwrap()
            .unwrap();

        assert_eq!(levels.stop_loss, dec!(100));
        assert_eq!(levels.risk_reward_ratio(dec!(100)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_levels_out_of_range() {
        let stops = AtrStops::default();
        let e28 = 10i128.pow(28);

        assert!(matches!(
            stops.levels(
                Decimal::from_i128_with_scale(e28, 0),
                Decimal::from_i128_with_scale(7 * e28, 0),
                Action::Long
            ),
            Err(RiskError::Overflow(_))
        ));
        // Offset fits but the target does not
        assert!(matches!(
            stops.levels(Decimal::MAX, dec!(1), Action::Long),
            Err(RiskError::Overflow(_))
        ));
    }
}
