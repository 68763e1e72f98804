//! Error types and handling infrastructure for incident-chronicle.
//!
//! This module provides a centralized error type using `thiserror`. Library code
//! returns [`Result`]; the binary wraps it in `anyhow` for context at the top level.
//!
//! Per-year dataset problems are deliberately NOT errors: they are folded into
//! [`YearOutcome`](crate::dataset::YearOutcome) values. Only failures that abort a
//! whole operation show up here.

use thiserror::Error;

/// The main error type for incident-chronicle operations.
#[derive(Error, Debug)]
pub enum ChronicleError {
    /// File system related errors (config file unreadable, log file, terminal IO)
    #[error("IO operation failed: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP client could not be constructed
    #[error("HTTP client error: {message}")]
    Http {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// Configuration file or option problems
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Structured data could not be decoded
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// The concurrent per-year fetch orchestration itself failed
    #[error("Dataset aggregation failed: {message}")]
    Aggregate { message: String },

    /// UI and terminal related errors
    #[error("UI operation failed: {message}")]
    UIError { message: String },

    /// Invalid command line arguments
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Standard Result type for incident-chronicle operations.
pub type Result<T> = std::result::Result<T, ChronicleError>;

impl ChronicleError {
    /// Create an Io error from an io::Error with additional context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an Http error from a reqwest error with additional context
    pub fn http(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            message: message.into(),
            source,
        }
    }

    /// Create a Config error with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a Parse error with a descriptive message
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an Aggregate error with a descriptive message
    pub fn aggregate(message: impl Into<String>) -> Self {
        Self::Aggregate {
            message: message.into(),
        }
    }

    /// Create a UIError with a descriptive message
    pub fn ui(message: impl Into<String>) -> Self {
        Self::UIError {
            message: message.into(),
        }
    }

    /// Create an InvalidArgument error with a descriptive message
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ChronicleError {
    fn from(err: std::io::Error) -> Self {
        let message = match err.kind() {
            std::io::ErrorKind::NotFound => "File not found",
            std::io::ErrorKind::PermissionDenied => "Permission denied",
            _ => "IO operation failed",
        };
        Self::Io {
            message: message.to_string(),
            source: err,
        }
    }
}

impl From<toml::de::Error> for ChronicleError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}
