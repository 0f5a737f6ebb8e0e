//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "squad")]
#[command(author, version, about = "Rule-based signal scoring and risk sizing for crypto pairs")]
pub struct Cli {
    /// Configuration file path (defaults to config/default.toml when present)
    #[arg(short, long, env = "SQUAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level, overrides the configured one
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate the latest candle: signal, entry/exit decision and risk
    Evaluate(EvaluateArgs),
    /// Print the latest indicator snapshot
    Indicators(IndicatorsArgs),
    /// Check portfolio limits
    Portfolio(PortfolioArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct EvaluateArgs {
    /// Candle file (CSV)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Trading pair
    #[arg(short, long, default_value = "BTC/USDT")]
    pub pair: String,

    /// Currently open trades
    #[arg(long, default_value = "0")]
    pub open_trades: usize,

    /// Current total exposure in quote currency
    #[arg(long, default_value = "0")]
    pub exposure: Decimal,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct IndicatorsArgs {
    /// Candle file (CSV)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Trading pair
    #[arg(short, long, default_value = "BTC/USDT")]
    pub pair: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct PortfolioArgs {
    /// Currently open trades
    #[arg(long)]
    pub open_trades: usize,

    /// Current total exposure in quote currency
    #[arg(long)]
    pub exposure: Decimal,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}
