//! Candle loading for offline evaluation.
//!
//! The host normally supplies candles; the CLI reads them from CSV.

mod csv_source;

pub use csv_source::CsvDataSource;

use std::path::Path;
use trading_core::error::DataError;
use trading_core::types::BarSeries;

/// Load a CSV file as the candle series for `pair`.
pub fn load_csv(path: impl AsRef<Path>, pair: &str) -> Result<BarSeries, DataError> {
    CsvDataSource::new(path)?.load(pair)
}
