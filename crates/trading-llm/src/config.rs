//! Chat-completion endpoint configuration.

use serde::{Deserialize, Serialize};
use trading_core::error::LlmError;

/// Endpoint, model and request settings.
///
/// The API key itself is never stored here; `api_key_env` names the
/// environment variable that holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key_env: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Score with the rule base when the endpoint fails
    pub use_fallback: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            model: "anthropic/claude-3.5-sonnet".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            timeout_secs: 30,
            use_fallback: true,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, LlmError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(LlmError::Configuration(format!(
                "{} not set",
                self.api_key_env
            ))),
        }
    }

    pub fn validate(&self) -> Result<(), LlmError> {
        if self.api_url.trim().is_empty() {
            return Err(LlmError::Configuration("api_url must not be empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(LlmError::Configuration("model must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(LlmError::Configuration(
                "timeout_secs must be at least 1".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(LlmError::Configuration(format!(
                "temperature must be in [0, 2], got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}
