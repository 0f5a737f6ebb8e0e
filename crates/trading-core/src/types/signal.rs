//! Trading signal types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction recommended by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Long,
    Short,
    Hold,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Long => "LONG",
            Action::Short => "SHORT",
            Action::Hold => "HOLD",
        }
    }

    /// True for LONG and SHORT.
    pub fn is_directional(&self) -> bool {
        !matches!(self, Action::Hold)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which path produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    /// Weighted-vote rule base, used as the primary engine
    Rules,
    /// Rule base substituted after the generative model failed
    RuleFallback,
    /// Reply from the generative-model collaborator
    Llm,
    /// No analysis was possible
    NoSignal,
}

/// A scored trading recommendation.
///
/// For rule-based signals `confidence` is the summed vote weight and can
/// exceed 1.0 (at most 2.1 with the default weights).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub action: Action,
    pub confidence: f64,
    pub reason: String,
    pub source: SignalSource,
}

impl Signal {
    pub fn new(
        action: Action,
        confidence: f64,
        reason: impl Into<String>,
        source: SignalSource,
    ) -> Self {
        Self {
            action,
            confidence,
            reason: reason.into(),
            source,
        }
    }

    /// Neutral HOLD with zero confidence.
    pub fn no_signal(reason: impl Into<String>) -> Self {
        Self::new(Action::Hold, 0.0, reason, SignalSource::NoSignal)
    }

    pub fn is_hold(&self) -> bool {
        self.action == Action::Hold
    }
}
