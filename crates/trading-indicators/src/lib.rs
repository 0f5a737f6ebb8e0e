//! Technical indicators and the indicator preparer.
//!
//! This crate provides batch implementations of the indicators the signal
//! engine reads:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD, Stochastic)
//! - Volatility indicators (ATR, Bollinger Bands, Standard Deviation)
//!
//! [`IndicatorPreparer`] runs all of them over a [`trading_core::BarSeries`]
//! and exposes the latest values as an [`IndicatorSnapshot`].

pub mod momentum;
pub mod moving_average;
pub mod prepare;
pub mod volatility;

pub use momentum::{Macd, MacdOutput, Rsi, Stochastic, StochasticOutput};
pub use moving_average::{Ema, Sma, Smoothing};
pub use prepare::{IndicatorConfig, IndicatorFrame, IndicatorPreparer, IndicatorSnapshot};
pub use volatility::{Atr, BollingerBands, BollingerOutput, StdDev};
