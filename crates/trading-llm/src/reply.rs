//! Free-text reply adapter.

use once_cell::sync::Lazy;
use regex::Regex;
use trading_core::types::{Action, Signal, SignalSource};

const DEFAULT_CONFIDENCE: f64 = 0.7;
const HOLD_CONFIDENCE: f64 = 0.5;

// English and Portuguese spellings
static CONFIDENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)confi(?:dence|an[çc]a)\s*[:=]?\s*([0-9]+(?:\.[0-9]+)?)").unwrap()
});

fn extract_confidence(text: &str) -> Option<f64> {
    CONFIDENCE
        .captures(text)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Turn a model reply into a signal.
///
/// The first of `LONG` or `SHORT` found (case-insensitive, LONG checked
/// first) sets the action; anything else is HOLD. The whole reply becomes
/// the reason.
pub fn parse_reply(text: &str) -> Signal {
    let upper = text.to_uppercase();
    let action = if upper.contains("LONG") {
        Action::Long
    } else if upper.contains("SHORT") {
        Action::Short
    } else {
        Action::Hold
    };

    let confidence = match action {
        Action::Hold => HOLD_CONFIDENCE,
        _ => extract_confidence(text).unwrap_or(DEFAULT_CONFIDENCE),
    };

    Signal::new(action, confidence, text.trim(), SignalSource::Llm)
}
