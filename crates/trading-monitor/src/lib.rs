//! Logging setup.

mod logging;

pub use logging::{setup_logging, LogFormat, LoggingConfig};
pub use tracing_appender::non_blocking::WorkerGuard;
