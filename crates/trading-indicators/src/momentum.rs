//! Momentum indicators.

use serde::{Deserialize, Serialize};
use trading_core::traits::{Indicator, MultiOutputIndicator};

use crate::moving_average::{Ema, Smoothing};

/// Relative Strength Index (RSI).
///
/// Averages up-moves and down-moves over the trailing window and maps
/// `rs = avg_gain / avg_loss` to `100 - 100 / (1 + rs)`. A window without
/// losses reads 100; a perfectly flat window reads 50.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    smoothing: Smoothing,
}

impl Rsi {
    /// RSI over plain rolling means of gains and losses.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            smoothing: Smoothing::Simple,
        }
    }

    /// RSI using Wilder's smoothing method.
    pub fn wilder(period: usize) -> Self {
        Self {
            smoothing: Smoothing::Wilder,
            ..Self::new(period)
        }
    }

    fn from_averages(gain: f64, loss: f64) -> f64 {
        if loss == 0.0 {
            if gain == 0.0 {
                50.0
            } else {
                100.0
            }
        } else {
            100.0 - (100.0 / (1.0 + gain / loss))
        }
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() <= self.period {
            return vec![];
        }

        let (gains, losses): (Vec<f64>, Vec<f64>) = data
            .windows(2)
            .map(|w| {
                let change = w[1] - w[0];
                if change > 0.0 {
                    (change, 0.0)
                } else {
                    (0.0, -change)
                }
            })
            .unzip();

        let avg_gains = self.smoothing.apply(&gains, self.period);
        let avg_losses = self.smoothing.apply(&losses, self.period);

        avg_gains
            .iter()
            .zip(avg_losses.iter())
            .map(|(&gain, &loss)| Self::from_averages(gain, loss))
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast: Ema::new(fast),
            slow: Ema::new(slow),
            signal: Ema::new(signal),
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        if data.len() < self.period() {
            return vec![];
        }

        let fast_ema = self.fast.calculate(data);
        let slow_ema = self.slow.calculate(data);

        // Align the EMAs (fast has more values)
        let offset = self.slow.period() - self.fast.period();
        let macd_line: Vec<f64> = fast_ema[offset..]
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = self.signal.calculate(&macd_line);

        let offset = self.signal.period() - 1;
        macd_line[offset..]
            .iter()
            .zip(signal_line.iter())
            .map(|(&macd, &signal)| MacdOutput {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.slow.period() + self.signal.period() - 1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

/// Stochastic oscillator output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticOutput {
    /// %K (fast stochastic)
    pub k: f64,
    /// %D (SMA of %K)
    pub d: f64,
}

/// Stochastic oscillator.
///
/// Compares closing price to the price range over a period.
#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
}

impl Stochastic {
    /// Create a new stochastic oscillator with default parameters (14, 3).
    pub fn new() -> Self {
        Self::with_periods(14, 3)
    }

    /// Create with custom periods.
    pub fn with_periods(k_period: usize, d_period: usize) -> Self {
        assert!(k_period > 0 && d_period > 0);
        Self { k_period, d_period }
    }

    /// Bars needed before the first output.
    pub fn period(&self) -> usize {
        self.k_period + self.d_period - 1
    }

    /// Calculate stochastic from OHLC data.
    pub fn calculate_ohlc(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
    ) -> Vec<StochasticOutput> {
        let len = high.len().min(low.len()).min(close.len());
        if len < self.period() {
            return vec![];
        }

        let k_values: Vec<f64> = ((self.k_period - 1)..len)
            .map(|i| {
                let start = i + 1 - self.k_period;
                let highest = high[start..=i].iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let lowest = low[start..=i].iter().cloned().fold(f64::INFINITY, f64::min);

                let range = highest - lowest;
                if range == 0.0 {
                    50.0 // Undefined, use midpoint
                } else {
                    ((close[i] - lowest) / range) * 100.0
                }
            })
            .collect();

        let d_period_f64 = self.d_period as f64;
        ((self.d_period - 1)..k_values.len())
            .map(|i| {
                let d = k_values[(i + 1 - self.d_period)..=i].iter().sum::<f64>() / d_period_f64;
                StochasticOutput { k: k_values[i], d }
            })
            .collect()
    }
}

impl Default for Stochastic {
    fn default() -> Self {
        Self::new()
    }
}
