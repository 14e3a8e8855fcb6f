//! Configuration error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {message}")]
    ParseError { message: String },

    #[error("failed to read config file {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("invalid URL for {field}: {value:?}")]
    InvalidUrl { field: String, value: String },

    #[error("invalid config value: {message}")]
    InvalidValue { message: String },
}
