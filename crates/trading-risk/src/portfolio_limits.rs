//! Portfolio-level guard consulted before opening new trades.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::RiskConfig;

/// Share of the full stake budget that open positions may occupy.
const MAX_EXPOSURE_RATIO: Decimal = dec!(0.8);

/// Coarse portfolio risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify a score: LOW below 0.3, MEDIUM below 0.7, HIGH otherwise.
    pub fn from_score(score: Decimal) -> Self {
        if score < dec!(0.3) {
            RiskLevel::Low
        } else if score < dec!(0.7) {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => f.write_str("LOW"),
            RiskLevel::Medium => f.write_str("MEDIUM"),
            RiskLevel::High => f.write_str("HIGH"),
        }
    }
}

/// Result of a portfolio check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStatus {
    pub can_open_new_trade: bool,
    /// Reasons new trades are blocked, in check order
    pub warnings: Vec<String>,
    pub open_trades: usize,
    pub total_exposure: Decimal,
    pub risk_score: Decimal,
    pub risk_level: RiskLevel,
}

/// Trade-count and exposure limits.
#[derive(Debug, Clone)]
pub struct PortfolioGuard {
    max_open_trades: usize,
    stake_amount: Decimal,
}

impl PortfolioGuard {
    pub fn new(config: &RiskConfig) -> Self {
        Self {
            max_open_trades: config.max_open_trades,
            stake_amount: config.stake_amount,
        }
    }

    /// Largest total exposure that still allows new trades.
    ///
    /// A budget beyond the decimal range saturates at [`Decimal::MAX`].
    pub fn max_exposure(&self) -> Decimal {
        self.full_budget()
            .checked_mul(MAX_EXPOSURE_RATIO)
            .unwrap_or(Decimal::MAX)
    }

    fn full_budget(&self) -> Decimal {
        self.stake_amount
            .checked_mul(Decimal::from(self.max_open_trades))
            .unwrap_or(Decimal::MAX)
    }

    /// Check externally tracked counters against the limits.
    pub fn check(&self, open_trades: usize, total_exposure: Decimal) -> PortfolioStatus {
        let mut warnings = Vec::new();

        if open_trades >= self.max_open_trades {
            warnings.push(format!(
                "Max open trades reached: {} (limit: {})",
                open_trades, self.max_open_trades
            ));
        }

        let max_exposure = self.max_exposure();
        if total_exposure > max_exposure {
            warnings.push(format!(
                "Total exposure too high: {:.2} (limit: {:.2})",
                total_exposure, max_exposure
            ));
        }

        let risk_score = self.risk_score(open_trades, total_exposure);

        PortfolioStatus {
            can_open_new_trade: warnings.is_empty(),
            warnings,
            open_trades,
            total_exposure,
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
        }
    }

    /// Mean of trade-slot usage and budget usage.
    ///
    /// A zero limit counts as fully used; ratios beyond the decimal range
    /// saturate.
    fn risk_score(&self, open_trades: usize, total_exposure: Decimal) -> Decimal {
        let ratio = |used: Decimal, limit: Decimal| {
            if limit.is_zero() {
                Decimal::ONE
            } else {
                used.checked_div(limit).unwrap_or(Decimal::MAX)
            }
        };
        let trade_ratio = ratio(
            Decimal::from(open_trades),
            Decimal::from(self.max_open_trades),
        );
        let exposure_ratio = ratio(total_exposure, self.full_budget());

        trade_ratio
            .checked_add(exposure_ratio)
            .unwrap_or(Decimal::MAX)
            / dec!(2)
    }
}
