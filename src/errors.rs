//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the service-request extraction engine. The
//! extractor itself is infallible by contract (an unmatched utterance yields
//! empty fields, never an error), so the types here cover construction-time
//! and operational concerns only: configuration loading, pattern compilation,
//! and the API surface.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from configuration, pattern setup, and the server
//! - **Output**: Structured error types with context and error chains
//! - **Error Categories**: Configuration, Patterns, API, Generic
//!
//! ## Usage
//! ```rust
//! use service_extract::errors::{Result, ExtractorError};
//!
//! fn load_setting() -> Result<u16> {
//!     Err(ExtractorError::Config {
//!         message: "missing server.port".to_string(),
//!     })
//! }
//! ```

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, ExtractorError>;

/// Error types for the extraction engine
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// A pattern in the catalog failed to compile
    #[error("Invalid pattern '{name}': {details}")]
    InvalidPattern { name: String, details: String },

    // API errors
    #[error("Invalid API request: {details}")]
    InvalidApiRequest { details: String },

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ExtractorError {
    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            ExtractorError::Config { .. } | ExtractorError::Toml(_) => "configuration",
            ExtractorError::InvalidPattern { .. } => "patterns",
            ExtractorError::InvalidApiRequest { .. } => "api",
            ExtractorError::Internal { .. } | ExtractorError::ValidationFailed { .. } => "generic",
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for ExtractorError {
    fn from(err: std::io::Error) -> Self {
        ExtractorError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

