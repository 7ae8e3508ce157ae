//! Error types for rNGSI-Adapter
//!
//! This module defines the error types used throughout the application.

use thiserror::Error;

/// Errors raised while turning a raw request body into an NGSI entity
#[derive(Error, Debug)]
pub enum ParseError {
    /// Neither the metric name nor the dimensions matched a known entity-type rule
    #[error("data point could not be mapped to an NGSI entity (unknown metric name or dimensions)")]
    Classification,

    /// Request body is not valid JSON
    #[error("invalid data point payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ParseError {
    /// Whether this error comes from the entity-type classification step
    pub fn is_classification(&self) -> bool {
        matches!(self, ParseError::Classification)
    }
}

/// Result type alias for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Parser error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O error reading the request body
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;
