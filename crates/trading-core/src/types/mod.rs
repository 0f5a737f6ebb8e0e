//! Core data types for the signal engine.

mod ohlcv;
mod signal;

pub use ohlcv::{Bar, BarSeries, PreciseBar};
pub use signal::{Action, Signal, SignalSource};
