//! Risk management for strategy signals.
//!
//! Provides ATR-based stop-loss/take-profit levels, risk-bounded position
//! sizing and the portfolio-level guard consulted before opening trades.

mod position_sizer;
mod stop_loss;
mod portfolio_limits;
mod risk_manager;

pub use position_sizer::PositionSizer;
pub use stop_loss::{AtrStops, ProtectiveLevels};
pub use portfolio_limits::{PortfolioGuard, PortfolioStatus, RiskLevel};
pub use risk_manager::{RiskCalculator, RiskConfig, RiskParameters};
