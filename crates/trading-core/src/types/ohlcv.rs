//! OHLCV (Open, High, Low, Close, Volume) candle types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A single candle.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// True if every price and the volume are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }
}

/// Exact-arithmetic view of a bar, used where prices feed currency math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreciseBar {
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl TryFrom<Bar> for PreciseBar {
    type Error = rust_decimal::Error;

    fn try_from(bar: Bar) -> Result<Self, Self::Error> {
        Ok(Self {
            timestamp: bar.datetime(),
            open: Decimal::try_from(bar.open)?,
            high: Decimal::try_from(bar.high)?,
            low: Decimal::try_from(bar.low)?,
            close: Decimal::try_from(bar.close)?,
            volume: Decimal::try_from(bar.volume)?,
        })
    }
}

/// Candle history for one trading pair, oldest first.
///
/// The engine only ever reads a series; the host owns and appends to it.
#[derive(Debug, Clone)]
pub struct BarSeries {
    /// Trading pair, e.g. `BTC/USDT`
    pub pair: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Create a new empty series.
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            bars: Vec::new(),
        }
    }

    /// Build a series from bars, rejecting out-of-order timestamps.
    pub fn from_bars(
        pair: impl Into<String>,
        bars: impl IntoIterator<Item = Bar>,
    ) -> Result<Self, DataError> {
        let mut series = Self::new(pair);
        for bar in bars {
            series.try_push(bar)?;
        }
        Ok(series)
    }

    /// Append a bar whose timestamp must be later than the last one.
    pub fn try_push(&mut self, bar: Bar) -> Result<(), DataError> {
        if let Some(last) = self.bars.last() {
            if bar.timestamp <= last.timestamp {
                return Err(DataError::OutOfOrder {
                    previous: last.timestamp,
                    next: bar.timestamp,
                });
            }
        }
        self.bars.push(bar);
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}
