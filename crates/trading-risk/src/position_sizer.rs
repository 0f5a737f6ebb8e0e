//! Risk-bounded position sizing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trading_core::error::RiskError;

/// Sizes positions so that hitting the stop loses a fixed share of the stake.
#[derive(Debug, Clone)]
pub struct PositionSizer {
    stake_amount: Decimal,
    stop_loss_percent: Decimal,
}

impl PositionSizer {
    pub fn new(stake_amount: Decimal, stop_loss_percent: Decimal) -> Self {
        Self {
            stake_amount,
            stop_loss_percent,
        }
    }

    /// Currency amount at risk per trade.
    pub fn risk_amount(&self) -> Result<Decimal, RiskError> {
        self.stake_amount
            .checked_mul(self.stop_loss_percent / dec!(100))
            .ok_or(RiskError::Overflow("risk amount"))
    }

    /// Base-asset units to trade at `price` with a stop at `stop_loss_price`.
    ///
    /// A stop on the entry price sizes at one unit. The result never
    /// exceeds what the stake buys at `price`.
    pub fn calculate(
        &self,
        price: Decimal,
        stop_loss_price: Decimal,
    ) -> Result<Decimal, RiskError> {
        if price <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        let risk_per_unit = price
            .checked_sub(stop_loss_price)
            .ok_or(RiskError::Overflow("stop distance"))?
            .abs();
        let size = if risk_per_unit > Decimal::ZERO {
            self.risk_amount()?
                .checked_div(risk_per_unit)
                .ok_or(RiskError::Overflow("position size"))?
        } else {
            Decimal::ONE
        };

        let max_affordable = self
            .stake_amount
            .checked_div(price)
            .ok_or(RiskError::Overflow("affordable size"))?;
        Ok(size.min(max_affordable))
    }
}
