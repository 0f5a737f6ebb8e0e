//! Volatility indicators.

use serde::{Deserialize, Serialize};
use trading_core::traits::{Indicator, MultiOutputIndicator};

use crate::moving_average::{Sma, Smoothing};

/// Population standard deviation over a rolling window.
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    /// Create a new standard deviation indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self { period }
    }
}

impl Indicator for StdDev {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let period_f64 = self.period as f64;
        data.windows(self.period)
            .map(|window| {
                let mean: f64 = window.iter().sum::<f64>() / period_f64;
                let variance: f64 =
                    window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period_f64;
                variance.sqrt()
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "StdDev"
    }
}

/// Average True Range (ATR).
///
/// True range is `max(high - low, |high - prev_close|, |low - prev_close|)`;
/// the first bar has no previous close and contributes `high - low`.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    smoothing: Smoothing,
}

impl Atr {
    /// ATR as the rolling mean of true range. Common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            smoothing: Smoothing::Simple,
        }
    }

    /// ATR using Wilder's smoothing.
    pub fn wilder(period: usize) -> Self {
        Self {
            smoothing: Smoothing::Wilder,
            ..Self::new(period)
        }
    }

    /// Bars needed before the first output.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Per-bar true range.
    pub fn true_ranges(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
        let len = high.len().min(low.len()).min(close.len());
        (0..len)
            .map(|i| {
                let high_low = high[i] - low[i];
                if i == 0 {
                    return high_low;
                }
                let high_close = (high[i] - close[i - 1]).abs();
                let low_close = (low[i] - close[i - 1]).abs();
                high_low.max(high_close).max(low_close)
            })
            .collect()
    }

    /// Calculate ATR from OHLC data.
    pub fn calculate_ohlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
        let tr = Self::true_ranges(high, low, close);
        self.smoothing.apply(&tr, self.period)
    }
}

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    pub upper: f64,
    /// Middle band (SMA)
    pub middle: f64,
    pub lower: f64,
}

impl BollingerOutput {
    /// Check if price is above upper band.
    pub fn is_overbought(&self, price: f64) -> bool {
        price > self.upper
    }

    /// Check if price is below lower band.
    pub fn is_oversold(&self, price: f64) -> bool {
        price < self.lower
    }
}

/// Bollinger Bands.
///
/// Consists of a middle band (SMA) with upper and lower bands
/// at a specified number of standard deviations.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    sma: Sma,
    std_dev: StdDev,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            sma: Sma::new(period),
            std_dev: StdDev::new(period),
            std_dev_multiplier,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> Vec<BollingerOutput> {
        self.sma
            .calculate(data)
            .into_iter()
            .zip(self.std_dev.calculate(data))
            .map(|(mean, std_dev)| BollingerOutput {
                upper: mean + self.std_dev_multiplier * std_dev,
                middle: mean,
                lower: mean - self.std_dev_multiplier * std_dev,
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.sma.period()
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_dev() {
        let std_dev = StdDev::new(3);
        let data = vec![2.0, 4.0, 6.0, 8.0, 10.0];
        let result = std_dev.calculate(&data);

        assert_eq!(result.len(), 3);
        // First window: [2, 4, 6], mean = 4, variance = (4+0+4)/3 = 8/3
        assert!((result[0] - (8.0f64 / 3.0).sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_true_ranges() {
        let high = vec![10.0, 11.0, 15.0];
        let low = vec![8.0, 10.5, 12.0];
        let close = vec![9.0, 11.0, 13.0];

        let tr = Atr::true_ranges(&high, &low, &close);
        assert_eq!(tr, vec![2.0, 2.0, 4.0]);
    }

    #[test]
    fn test_atr_constant_range() {
        let atr = Atr::new(14);
        let high = vec![101.0; 14];
        let low = vec![99.0; 14];
        let close = vec![100.0; 14];

        let result = atr.calculate_ohlc(&high, &low, &close);
        assert_eq!(result.len(), 1);
        assert!((result[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_atr_insufficient_history() {
        let atr = Atr::new(14);
        let result = atr.calculate_ohlc(&[101.0; 13], &[99.0; 13], &[100.0; 13]);

        assert!(result.is_empty());
    }

    #[test]
    fn test_atr_ohlc_positive() {
        let high = vec![10.0, 11.0, 12.0, 11.0, 13.0, 14.0];
        let low = vec![8.0, 9.0, 10.0, 9.0, 11.0, 12.0];
        let close = vec![9.0, 10.0, 11.0, 10.0, 12.0, 13.0];

        for atr in [Atr::new(3), Atr::wilder(3)] {
            let result = atr.calculate_ohlc(&high, &low, &close);
            assert_eq!(result.len(), 4);
            assert!(result.iter().all(|v| *v > 0.0));
        }
    }

    #[test]
    fn test_bollinger_bands() {
        let bb = BollingerBands::new();
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.1).sin() * 5.0)
            .collect();

        let result = bb.calculate(&data);
        assert_eq!(result.len(), 11);

        for output in &result {
            assert!(output.upper > output.middle);
            assert!(output.middle > output.lower);
            assert!(((output.upper - output.middle) - (output.middle - output.lower)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bollinger_constant_price_collapses() {
        let bb = BollingerBands::with_params(5, 2.0);
        let result = bb.calculate(&[100.0; 5]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].upper, 100.0);
        assert_eq!(result[0].lower, 100.0);
    }

    #[test]
    fn test_bollinger_overbought_oversold() {
        let output = BollingerOutput {
            upper: 110.0,
            middle: 100.0,
            lower: 90.0,
        };

        assert!(output.is_overbought(115.0));
        assert!(!output.is_overbought(105.0));
        assert!(output.is_oversold(85.0));
        assert!(!output.is_oversold(95.0));
    }
}
