//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration management for the extraction engine, supporting
//! TOML files and environment variable overrides with validation and type-safe
//! access to all system settings.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files (TOML), environment variables
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Type checking, range validation, dependency verification
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables (highest priority)
//! 2. Configuration files
//! 3. Default values (lowest priority)
//!
//! ## Usage
//! ```rust,no_run
//! use service_extract::config::Config;
//!
//! # fn main() -> service_extract::Result<()> {
//! // Load from default locations
//! let config = Config::load()?;
//!
//! // Access configuration
//! println!("Server port: {}", config.server.port);
//! # Ok(())
//! # }
//! ```

use crate::errors::{ExtractorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Extraction pipeline configuration
    pub extraction: ExtractionConfig,
    /// Logging and monitoring
    pub logging: LoggingConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Number of HTTP worker threads
    pub workers: usize,
    /// Maximum request payload size in KB
    pub max_payload_size_kb: u32,
    /// Enable CORS for the web front end
    pub enable_cors: bool,
    /// Origins allowed when CORS is enabled
    pub allowed_origins: Vec<String>,
}

/// Extraction pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Qualifier words stripped from captured service phrases
    pub qualifier_stoplist: Vec<String>,
    /// Maximum accepted utterance length in characters
    pub max_query_length: usize,
    /// Apply Unicode NFC normalization before matching
    pub normalize_unicode: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Emit logs as JSON
    pub json_format: bool,
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ExtractorError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| {
            tracing::error!("Failed to parse config file {:?}", path);
            ExtractorError::from(e)
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVICE_EXTRACT_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("SERVICE_EXTRACT_PORT") {
            self.server.port = port.parse().map_err(|_| ExtractorError::Config {
                message: "Invalid port number in SERVICE_EXTRACT_PORT".to_string(),
            })?;
        }
        if let Ok(level) = std::env::var("SERVICE_EXTRACT_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ExtractorError::ValidationFailed {
                field: "server.port".to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        if self.server.workers == 0 {
            return Err(ExtractorError::ValidationFailed {
                field: "server.workers".to_string(),
                reason: "Worker count must be greater than zero".to_string(),
            });
        }

        if self.extraction.max_query_length == 0 {
            return Err(ExtractorError::ValidationFailed {
                field: "extraction.max_query_length".to_string(),
                reason: "Maximum query length must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Get configuration as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ExtractorError::Config {
            message: format!("Failed to serialize config to TOML: {}", e),
        })
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            extraction: ExtractionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: num_cpus::get(),
            max_payload_size_kb: 64,
            enable_cors: true,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            qualifier_stoplist: vec![
                "local".to_string(),
                "some".to_string(),
                "good".to_string(),
                "best".to_string(),
                "reliable".to_string(),
                "professional".to_string(),
            ],
            max_query_length: 500,
            normalize_unicode: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extraction.qualifier_stoplist.len(), 6);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(
            parsed.extraction.qualifier_stoplist,
            config.extraction.qualifier_stoplist
        );
    }

    #[test]
    fn test_malformed_toml_maps_to_toml_variant() {
        let parse_error = toml::from_str::<Config>("server = 3").unwrap_err();
        let error = ExtractorError::from(parse_error);
        assert!(matches!(error, ExtractorError::Toml(_)));
        assert_eq!(error.category(), "configuration");
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }
}
