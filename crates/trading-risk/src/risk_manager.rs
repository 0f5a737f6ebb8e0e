//! Unified risk calculator.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use trading_core::error::RiskError;
use trading_core::types::{Action, BarSeries, PreciseBar};
use trading_indicators::Atr;

use crate::{AtrStops, PortfolioGuard, PortfolioStatus, PositionSizer};

/// Risk management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Maximum concurrently open trades
    pub max_open_trades: usize,
    /// Quote-currency budget per trade
    pub stake_amount: Decimal,
    /// Percentage of the stake risked per trade
    pub stop_loss_percent: Decimal,
    pub atr_period: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_open_trades: 3,
            stake_amount: dec!(100),
            stop_loss_percent: dec!(2),
            atr_period: 14,
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<(), RiskError> {
        if self.max_open_trades == 0 {
            return Err(RiskError::InvalidConfig(
                "max_open_trades must be at least 1".to_string(),
            ));
        }
        if self.stake_amount <= Decimal::ZERO {
            return Err(RiskError::InvalidConfig(format!(
                "stake_amount must be positive, got {}",
                self.stake_amount
            )));
        }
        if self.stop_loss_percent <= Decimal::ZERO || self.stop_loss_percent > dec!(100) {
            return Err(RiskError::InvalidConfig(format!(
                "stop_loss_percent must be in (0, 100], got {}",
                self.stop_loss_percent
            )));
        }
        if self.atr_period == 0 {
            return Err(RiskError::InvalidConfig(
                "atr_period must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Stops, targets and size for one prospective entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskParameters {
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    /// Base-asset units
    pub position_size: Decimal,
    pub risk_reward_ratio: Decimal,
    pub atr: Decimal,
    pub max_risk_amount: Decimal,
}

impl RiskParameters {
    /// Parameters returned when there is nothing to protect.
    pub fn neutral(stake_amount: Decimal) -> Self {
        Self {
            stop_loss: Decimal::ZERO,
            take_profit: Decimal::ZERO,
            position_size: Decimal::ONE,
            risk_reward_ratio: dec!(2.0),
            atr: Decimal::ZERO,
            max_risk_amount: stake_amount * dec!(0.02),
        }
    }
}

/// Derives stops, targets and sizing from recent volatility.
#[derive(Debug, Clone)]
pub struct RiskCalculator {
    config: RiskConfig,
    atr: Atr,
    stops: AtrStops,
    sizer: PositionSizer,
    guard: PortfolioGuard,
}

impl RiskCalculator {
    pub fn new(config: RiskConfig) -> Result<Self, RiskError> {
        config.validate()?;
        Ok(Self {
            atr: Atr::new(config.atr_period),
            stops: AtrStops::default(),
            sizer: PositionSizer::new(config.stake_amount, config.stop_loss_percent),
            guard: PortfolioGuard::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Compute risk parameters, falling back to neutral values on error.
    pub fn compute_risk(&self, series: &BarSeries, action: Action) -> RiskParameters {
        match self.try_compute_risk(series, action) {
            Ok(params) => params,
            Err(e) => {
                warn!(
                    pair = %series.pair,
                    error = %e,
                    "Risk computation failed, using neutral parameters"
                );
                RiskParameters::neutral(self.config.stake_amount)
            }
        }
    }

    /// Compute risk parameters for entering `action` at the latest close.
    pub fn try_compute_risk(
        &self,
        series: &BarSeries,
        action: Action,
    ) -> Result<RiskParameters, RiskError> {
        let last = match series.last() {
            Some(bar) if action.is_directional() => *bar,
            _ => return Ok(RiskParameters::neutral(self.config.stake_amount)),
        };

        let bar = PreciseBar::try_from(last).map_err(|_| RiskError::InvalidPrice(last.close))?;
        let price = bar.close;
        if price <= Decimal::ZERO {
            return Err(RiskError::InvalidPrice(last.close));
        }

        let atr = self.current_atr(series, last.close)?;
        let Some(levels) = self.stops.levels(price, atr, action)? else {
            return Ok(RiskParameters::neutral(self.config.stake_amount));
        };

        let params = RiskParameters {
            stop_loss: levels.stop_loss,
            take_profit: levels.take_profit,
            position_size: self.sizer.calculate(price, levels.stop_loss)?,
            risk_reward_ratio: levels.risk_reward_ratio(price)?,
            atr,
            max_risk_amount: self.sizer.risk_amount()?,
        };

        info!(
            pair = %series.pair,
            action = %action,
            price = %price,
            stop_loss = %params.stop_loss.round_dp(8),
            take_profit = %params.take_profit.round_dp(8),
            size = %params.position_size.round_dp(8),
            rr = %params.risk_reward_ratio.round_dp(2),
            "Risk parameters computed"
        );

        Ok(params)
    }

    /// Latest ATR, or 2% of the close while history is too short.
    fn current_atr(&self, series: &BarSeries, close: f64) -> Result<Decimal, RiskError> {
        let value = self
            .atr
            .calculate_ohlc(&series.highs(), &series.lows(), &series.closes())
            .pop();

        let atr = match value {
            Some(atr) => atr,
            None => {
                debug!(
                    pair = %series.pair,
                    bars = series.len(),
                    required = self.atr.period(),
                    "Short history, estimating ATR from close"
                );
                close * 0.02
            }
        };

        if !atr.is_finite() || atr < 0.0 {
            return Err(RiskError::InvalidAtr(atr));
        }
        Decimal::try_from(atr).map_err(|_| RiskError::InvalidAtr(atr))
    }

    /// Portfolio guard check against the configured limits.
    pub fn check_portfolio(&self, open_trades: usize, total_exposure: Decimal) -> PortfolioStatus {
        let status = self.guard.check(open_trades, total_exposure);
        for warning in &status.warnings {
            warn!(open_trades, total_exposure = %total_exposure, "{}", warning);
        }
        status
    }
}
