//! Indicator preparation over a candle series.
//!
//! [`IndicatorPreparer::prepare`] never fails: malformed input is logged and
//! the affected columns are left empty so downstream scoring degrades to its
//! own defaults.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use trading_core::error::IndicatorError;
use trading_core::traits::{Indicator, MultiOutputIndicator};
use trading_core::types::{Bar, BarSeries};

use crate::momentum::{Macd, MacdOutput, Rsi, Stochastic, StochasticOutput};
use crate::moving_average::{Ema, Sma};
use crate::volatility::{Atr, BollingerBands, BollingerOutput};

/// Indicator periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub ema_short: usize,
    pub ema_long: usize,
    pub bollinger_period: usize,
    pub bollinger_std: f64,
    pub atr_period: usize,
    pub volume_period: usize,
    pub stoch_k: usize,
    pub stoch_d: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            ema_short: 9,
            ema_long: 21,
            bollinger_period: 20,
            bollinger_std: 2.0,
            atr_period: 14,
            volume_period: 20,
            stoch_k: 14,
            stoch_d: 3,
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("ema_short", self.ema_short),
            ("ema_long", self.ema_long),
            ("atr_period", self.atr_period),
            ("volume_period", self.volume_period),
            ("stoch_k", self.stoch_k),
            ("stoch_d", self.stoch_d),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| *period == 0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "{} must be greater than 0",
                name
            )));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(IndicatorError::InvalidParameter(
                "macd_fast must be less than macd_slow".into(),
            ));
        }
        if self.ema_short >= self.ema_long {
            return Err(IndicatorError::InvalidParameter(
                "ema_short must be less than ema_long".into(),
            ));
        }
        if self.bollinger_period < 2 {
            return Err(IndicatorError::InvalidParameter(
                "bollinger_period must be at least 2".into(),
            ));
        }
        if self.bollinger_std.is_nan() || self.bollinger_std <= 0.0 {
            return Err(IndicatorError::InvalidParameter(
                "bollinger_std must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Indicator values at one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub timestamp: i64,
    pub close: f64,
    pub volume: f64,
    pub rsi: Option<f64>,
    pub macd: Option<MacdOutput>,
    pub ema_short: Option<f64>,
    pub ema_long: Option<f64>,
    pub bollinger: Option<BollingerOutput>,
    pub volume_sma: Option<f64>,
    pub atr: Option<f64>,
    pub stochastic: Option<StochasticOutput>,
}

impl IndicatorSnapshot {
    /// A snapshot carrying only price and volume.
    pub fn bare(bar: &Bar) -> Self {
        Self {
            timestamp: bar.timestamp,
            close: bar.close,
            volume: bar.volume,
            rsi: None,
            macd: None,
            ema_short: None,
            ema_long: None,
            bollinger: None,
            volume_sma: None,
            atr: None,
            stochastic: None,
        }
    }

    pub fn macd_histogram(&self) -> Option<f64> {
        self.macd.map(|m| m.histogram)
    }

    /// Volume above its moving average.
    pub fn volume_above_average(&self) -> bool {
        self.volume_sma.is_some_and(|avg| self.volume > avg)
    }
}

/// Indicator columns aligned to the bars they were computed from.
///
/// Every column has one entry per bar; entries are `None` until the
/// indicator's window is full.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    bars: Vec<Bar>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<MacdOutput>>,
    pub ema_short: Vec<Option<f64>>,
    pub ema_long: Vec<Option<f64>>,
    pub bollinger: Vec<Option<BollingerOutput>>,
    pub volume_sma: Vec<Option<f64>>,
    pub atr: Vec<Option<f64>>,
    pub stochastic: Vec<Option<StochasticOutput>>,
}

impl IndicatorFrame {
    fn empty(bars: Vec<Bar>) -> Self {
        let len = bars.len();
        Self {
            bars,
            rsi: vec![None; len],
            macd: vec![None; len],
            ema_short: vec![None; len],
            ema_long: vec![None; len],
            bollinger: vec![None; len],
            volume_sma: vec![None; len],
            atr: vec![None; len],
            stochastic: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Indicator values at bar `index` (0 = oldest).
    pub fn snapshot_at(&self, index: usize) -> Option<IndicatorSnapshot> {
        let bar = self.bars.get(index)?;
        Some(IndicatorSnapshot {
            rsi: self.rsi[index],
            macd: self.macd[index],
            ema_short: self.ema_short[index],
            ema_long: self.ema_long[index],
            bollinger: self.bollinger[index],
            volume_sma: self.volume_sma[index],
            atr: self.atr[index],
            stochastic: self.stochastic[index],
            ..IndicatorSnapshot::bare(bar)
        })
    }

    /// Indicator values at the most recent bar.
    pub fn latest(&self) -> Option<IndicatorSnapshot> {
        self.snapshot_at(self.bars.len().checked_sub(1)?)
    }
}

/// Derives every indicator column from a candle series.
#[derive(Debug, Clone)]
pub struct IndicatorPreparer {
    config: IndicatorConfig,
    rsi: Rsi,
    macd: Macd,
    ema_short: Ema,
    ema_long: Ema,
    bollinger: BollingerBands,
    volume_sma: Sma,
    atr: Atr,
    stochastic: Stochastic,
}

impl IndicatorPreparer {
    /// Build a preparer from validated periods.
    pub fn new(config: IndicatorConfig) -> Result<Self, IndicatorError> {
        config.validate()?;
        Ok(Self {
            rsi: Rsi::new(config.rsi_period),
            macd: Macd::with_periods(config.macd_fast, config.macd_slow, config.macd_signal),
            ema_short: Ema::new(config.ema_short),
            ema_long: Ema::new(config.ema_long),
            bollinger: BollingerBands::with_params(config.bollinger_period, config.bollinger_std),
            volume_sma: Sma::new(config.volume_period),
            atr: Atr::new(config.atr_period),
            stochastic: Stochastic::with_periods(config.stoch_k, config.stoch_d),
            config,
        })
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Bars needed before every column has a value.
    pub fn warmup_period(&self) -> usize {
        [
            Indicator::period(&self.rsi),
            MultiOutputIndicator::period(&self.macd),
            Indicator::period(&self.ema_long),
            MultiOutputIndicator::period(&self.bollinger),
            Indicator::period(&self.volume_sma),
            self.atr.period(),
            self.stochastic.period(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Compute all indicator columns for `series`.
    pub fn prepare(&self, series: &BarSeries) -> IndicatorFrame {
        let bars: Vec<Bar> = series.iter().copied().collect();
        let len = bars.len();
        let mut frame = IndicatorFrame::empty(bars);

        if len < self.warmup_period() {
            debug!(
                pair = %series.pair,
                bars = len,
                warmup = self.warmup_period(),
                "Series shorter than warm-up, some indicators will be empty"
            );
        }

        let closes = series.closes();
        match check_finite("close", &closes) {
            Ok(()) => {
                frame.rsi = align(self.rsi.calculate(&closes), len);
                frame.macd = align(self.macd.calculate(&closes), len);
                frame.ema_short = align(self.ema_short.calculate(&closes), len);
                frame.ema_long = align(self.ema_long.calculate(&closes), len);
                frame.bollinger = align(self.bollinger.calculate(&closes), len);
            }
            Err(e) => warn!(pair = %series.pair, error = %e, "Skipping close-based indicators"),
        }

        let volumes = series.volumes();
        match check_finite("volume", &volumes) {
            Ok(()) => frame.volume_sma = align(self.volume_sma.calculate(&volumes), len),
            Err(e) => warn!(pair = %series.pair, error = %e, "Skipping volume average"),
        }

        let highs = series.highs();
        let lows = series.lows();
        let ranges_ok = check_finite("high", &highs)
            .and_then(|_| check_finite("low", &lows))
            .and_then(|_| check_finite("close", &closes));
        match ranges_ok {
            Ok(()) => {
                frame.atr = align(self.atr.calculate_ohlc(&highs, &lows, &closes), len);
                frame.stochastic =
                    align(self.stochastic.calculate_ohlc(&highs, &lows, &closes), len);
            }
            Err(e) => warn!(pair = %series.pair, error = %e, "Skipping range-based indicators"),
        }

        frame
    }

    /// Prepare `series` and return only the latest snapshot.
    pub fn snapshot(&self, series: &BarSeries) -> Option<IndicatorSnapshot> {
        self.prepare(series).latest()
    }
}

fn check_finite(column: &'static str, values: &[f64]) -> Result<(), IndicatorError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(IndicatorError::NonFinite { column, index }),
        None => Ok(()),
    }
}

/// Left-pad trimmed indicator output with `None` up to `len` entries.
fn align<T: Copy>(values: Vec<T>, len: usize) -> Vec<Option<T>> {
    let pad = len.saturating_sub(values.len());
    std::iter::repeat(None)
        .take(pad)
        .chain(values.into_iter().map(Some))
        .take(len)
        .collect()
}
