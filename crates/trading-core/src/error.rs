//! Error types for the signal engine.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),

    #[error("Risk error: {0}")]
    Risk(#[from] RiskError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Errors raised while producing a trading signal.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Insufficient data: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Missing price data")]
    MissingPrice,

    #[error("Signal source unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while deriving risk parameters.
#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    #[error("Invalid volatility estimate: {0}")]
    InvalidAtr(f64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Arithmetic overflow computing {0}")]
    Overflow(&'static str),
}

/// Data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Timestamps must be strictly increasing: {previous} followed by {next}")]
    OutOfOrder { previous: i64, next: i64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Non-finite input in {column} at index {index}")]
    NonFinite { column: &'static str, index: usize },
}

/// Failures of the chat-completion collaborator.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Out of credits (HTTP 402)")]
    PaymentRequired,

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Response contained no choices")]
    EmptyResponse,
}

/// Result type alias for engine operations.
pub type TradingResult<T> = Result<T, TradingError>;
