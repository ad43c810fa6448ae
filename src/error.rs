use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(toisto::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(toisto::config))]
    Config(String),

    #[error("Calendar data error: {0}")]
    #[diagnostic(code(toisto::calendar_data))]
    CalendarData(String),

    #[error(transparent)]
    #[diagnostic(code(toisto::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(toisto::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(toisto::other))]
    Other(String),
}

// Implement From for JSON deserialization errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type ToistoResult<T> = Result<T, Error>;

/// Helper to create environment errors
#[allow(dead_code)]
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create calendar data errors
pub fn calendar_data_error(message: &str) -> Error {
    Error::CalendarData(message.to_string())
}
