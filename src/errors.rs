//! # Application Error Types
//!
//! This module defines the error types used by the recipe viewer.
//! Only configuration and source loading can fail; everything downstream
//! of a loaded snapshot degrades to empty results instead of erroring.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// A tabular source could not be fetched
    Source(String),
    /// A tabular source was fetched but could not be parsed
    Parse(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Source(msg) => write!(f, "[SOURCE] {}", msg),
            AppError::Parse(msg) => write!(f, "[PARSE] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Source(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Source(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::{error, warn};

    /// Log a tabular source that could not be loaded and was replaced by an empty set
    pub fn log_source_error(error: &impl std::fmt::Display, source: &str, location: Option<&str>) {
        warn!(
            error = %error,
            source = %source,
            location = ?location,
            "Source unavailable, substituting empty data"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }

    /// Log internal application errors with component context
    pub fn log_internal_error(error: &impl std::fmt::Display, component: &str, operation: &str) {
        error!(
            error = %error,
            component = %component,
            operation = %operation,
            "Internal application error"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_tags() {
        assert_eq!(
            AppError::Config("bad ttl".to_string()).to_string(),
            "[CONFIG] bad ttl"
        );
        assert_eq!(
            AppError::Source("timeout".to_string()).to_string(),
            "[SOURCE] timeout"
        );
    }

    #[test]
    fn test_io_error_maps_to_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        assert!(matches!(AppError::from(io), AppError::Source(_)));
    }
}
