//! Error types for the OpenTSDB sink library
//!
//! Defines all error types used throughout the library with clear error messages
//! and context for debugging.

use thiserror::Error;

/// Main error type for the OpenTSDB sink library
#[derive(Error, Debug)]
pub enum TsdbError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] TsdbConfigError),

    /// Connection-establishment errors
    #[error("Connection error: {0}")]
    Connection(#[from] TsdbConnectionError),

    /// Sample-encoding errors
    #[error("Encoding error: {0}")]
    Encode(#[from] TsdbEncodeError),

    /// I/O errors (mid-stream write or flush failures)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum TsdbConfigError {
    /// Missing required configuration field
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Invalid store port
    #[error("Invalid port: {0}")]
    InvalidPort(String),

    /// Invalid metric-id prefix
    #[error("Invalid metric prefix: {0}")]
    InvalidPrefix(String),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Connection-establishment errors
///
/// A failed connect is fatal to the sink instance; there is no retry loop.
#[derive(Error, Debug)]
pub enum TsdbConnectionError {
    /// The store is unreachable or refused the connection
    #[error("Failed to connect to store: {0}")]
    ConnectFailed(String),

    /// A batch arrived while no connection is established
    #[error("Connection to store is not established")]
    NotConnected,
}

/// Sample-encoding errors
#[derive(Error, Debug)]
pub enum TsdbEncodeError {
    /// A data point carried a value shape the encoder does not understand
    #[error("Unsupported value shape for metric {metric_id}: {value}")]
    UnsupportedValue {
        /// Full metric id of the offending data point
        metric_id: String,
        /// The offending value, rendered as JSON
        value: String,
    },
}

impl From<anyhow::Error> for TsdbError {
    fn from(err: anyhow::Error) -> Self {
        TsdbError::Io(std::io::Error::other(err.to_string()))
    }
}
