//! CLI command implementations.

pub mod evaluate;
pub mod indicators;
pub mod portfolio;
pub mod validate;
