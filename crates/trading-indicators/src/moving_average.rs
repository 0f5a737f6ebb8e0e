//! Moving average indicators.

use serde::{Deserialize, Serialize};
use trading_core::traits::Indicator;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let mut result = Vec::with_capacity(data.len() - self.period + 1);
        let period_f64 = self.period as f64;

        // Initial sum
        let mut sum: f64 = data[..self.period].iter().sum();
        result.push(sum / period_f64);

        // Sliding window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result.push(sum / period_f64);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Seeded with the SMA of the first `span` values, then smoothed with
/// `alpha = 2 / (span + 1)`.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
}

impl Ema {
    /// Create a new EMA with the specified span.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        let multiplier = 2.0 / (period as f64 + 1.0);
        Self { period, multiplier }
    }

    /// Smoothing factor derived from the span.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let mut result = Vec::with_capacity(data.len() - self.period + 1);

        // Initialize with SMA
        let initial_sma: f64 = data[..self.period].iter().sum::<f64>() / self.period as f64;
        result.push(initial_sma);

        let mut ema = initial_sma;
        let one_minus_mult = 1.0 - self.multiplier;

        for &price in &data[self.period..] {
            ema = price * self.multiplier + ema * one_minus_mult;
            result.push(ema);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// How RSI and ATR average their per-bar inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Smoothing {
    /// Plain rolling mean over the trailing window.
    #[default]
    Simple,
    /// Wilder's running average: `avg = (prev * (n - 1) + value) / n`.
    Wilder,
}

impl Smoothing {
    /// Smooth `values` over `period`, one output per complete window.
    pub fn apply(&self, values: &[f64], period: usize) -> Vec<f64> {
        match self {
            Smoothing::Simple => Sma::new(period).calculate(values),
            Smoothing::Wilder => wilder_smooth(values, period),
        }
    }
}

fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    if values.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(values.len() - period + 1);
    let period_f64 = period as f64;

    let mut avg: f64 = values[..period].iter().sum::<f64>() / period_f64;
    result.push(avg);

    for &value in &values[period..] {
        avg = (avg * (period_f64 - 1.0) + value) / period_f64;
        result.push(avg);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let sma = Sma::new(3);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma.calculate(&data);

        assert_eq!(result.len(), 3);
        assert!((result[0] - 2.0).abs() < 1e-10); // (1+2+3)/3
        assert!((result[1] - 3.0).abs() < 1e-10); // (2+3+4)/3
        assert!((result[2] - 4.0).abs() < 1e-10); // (3+4+5)/3
    }

    #[test]
    fn test_sma_insufficient_data() {
        let sma = Sma::new(5);
        let result = sma.calculate(&[1.0, 2.0, 3.0]);

        assert!(result.is_empty());
    }

    #[test]
    fn test_ema() {
        let ema = Ema::new(3);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = ema.calculate(&data);

        assert_eq!(result.len(), 3);
        assert!((result[0] - 2.0).abs() < 1e-10); // Initial SMA
        // mult = 2/(3+1) = 0.5
        // result[1] = 4 * 0.5 + 2 * 0.5 = 3.0
        assert!((result[1] - 3.0).abs() < 1e-10);
        assert!((result[2] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_multiplier_from_span() {
        assert!((Ema::new(9).multiplier() - 0.2).abs() < 1e-12);
        assert!((Ema::new(21).multiplier() - 2.0 / 22.0).abs() < 1e-12);
    }

    #[test]
    fn test_smoothing_simple_vs_wilder() {
        let values = vec![1.0, 1.0, 1.0, 4.0];

        let simple = Smoothing::Simple.apply(&values, 3);
        assert_eq!(simple.len(), 2);
        assert!((simple[1] - 2.0).abs() < 1e-10); // (1+1+4)/3

        let wilder = Smoothing::Wilder.apply(&values, 3);
        assert_eq!(wilder.len(), 2);
        assert!((wilder[1] - 2.0).abs() < 1e-10); // (1*2 + 4)/3
    }

    #[test]
    fn test_wilder_diverges_from_simple_after_window() {
        let values = vec![3.0, 3.0, 3.0, 0.0, 0.0, 0.0];

        let simple = Smoothing::Simple.apply(&values, 3);
        let wilder = Smoothing::Wilder.apply(&values, 3);

        // The rolling mean forgets the first window entirely
        assert!(simple.last().unwrap().abs() < 1e-10);
        // Wilder's average decays but never drops it
        assert!(*wilder.last().unwrap() > 0.0);
    }
}
