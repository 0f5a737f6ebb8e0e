//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings};
pub use trading_monitor::{LogFormat, LoggingConfig};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use tracing::debug;

/// Path used when no configuration file is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Prefix of environment overrides, e.g. `SQUAD__RISK__STAKE_AMOUNT`.
pub const ENV_PREFIX: &str = "SQUAD";

/// Load configuration from file and environment.
///
/// An explicit `path` must exist. Without one, `config/default.toml` is
/// read when present and built-in defaults apply otherwise.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_PATH).required(false),
    };

    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    debug!(app = %app.app.name, environment = %app.app.environment, "Configuration loaded");
    Ok(app)
}
