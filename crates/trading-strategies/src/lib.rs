//! Signal scoring and the host-facing strategy facade.
//!
//! This crate turns indicator snapshots into trading signals:
//! - [`RuleScorer`]: weighted RSI / MACD / EMA vote
//! - [`ChartAnalyst`]: chat-backend analysis with rule-based fallback
//! - Classic Bollinger/volume entry and exit rules
//! - [`SquadStrategy`]: evaluation, risk and portfolio checks for one host

mod analyst;
mod rules;
mod scorer;
mod squad;

pub use analyst::ChartAnalyst;
pub use rules::{classic_entry, exit_rules, EntryMode, ExitDecision};
pub use scorer::{RuleScorer, ScorerConfig};
pub use squad::{EntryDecision, SquadConfig, SquadStrategy};
