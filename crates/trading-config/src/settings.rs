//! Configuration structures.

use serde::{Deserialize, Serialize};
use trading_core::{TradingError, TradingResult};
use trading_indicators::IndicatorConfig;
use trading_llm::LlmConfig;
use trading_monitor::LoggingConfig;
use trading_risk::RiskConfig;
use trading_strategies::{ScorerConfig, SquadConfig};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub indicators: IndicatorConfig,
    #[serde(default)]
    pub signals: ScorerConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Check every section, reporting the first problem found.
    pub fn validate(&self) -> TradingResult<()> {
        if self.app.name.trim().is_empty() {
            return Err(TradingError::Config("app.name must not be empty".into()));
        }
        self.indicators.validate()?;
        self.signals.validate()?;
        self.risk.validate()?;
        self.llm.validate()?;
        Ok(())
    }

    /// The sections the strategy facade is built from.
    pub fn squad(&self) -> SquadConfig {
        SquadConfig {
            indicators: self.indicators.clone(),
            signals: self.signals.clone(),
            risk: self.risk.clone(),
            llm: self.llm.clone(),
        }
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "trading-squad".to_string(),
            environment: "development".to_string(),
        }
    }
}
