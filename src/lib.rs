//! # Service Request Extraction Engine
//!
//! ## Overview
//! This library implements the structured service-request extractor behind a
//! local-services marketplace: given a free-form utterance ("umm i need
//! plumber", "I need a plumber in Mozang, Lahore") it recovers a
//! `(service, location)` pair, falling back to previously known user-location
//! context when the utterance omits a location.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `patterns`: The ordered, prioritized pattern catalog for services and locations
//! - `extractor`: Matching pipeline, stoplist cleaning, and location fallback
//! - `api`: REST API endpoints serving extraction to the web front end
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//! - `utils`: Text helpers and timing utilities
//!
//! ## Input/Output Specification
//! - **Input**: Raw utterance text, optional previously resolved user location
//! - **Output**: `ExtractionResult` with service and location strings (empty when unmatched)
//! - **Performance**: Pure synchronous matching over short strings, deterministic results
//!
//! ## Usage
//! ```rust
//! use service_extract::{Extractor, config::ExtractionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = Extractor::new(ExtractionConfig::default())?;
//!     let result = extractor.extract("I need a plumber in Mozang, Lahore", None);
//!     println!("service={} location={}", result.service, result.location);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod errors;
pub mod extractor;
pub mod patterns;
pub mod api;

// Utilities
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use errors::{ExtractorError, Result};
pub use extractor::{ExtractionResult, Extractor};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Previously resolved user location supplied by the caller for fallback
/// substitution. Immutable input; the extractor never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLocation {
    /// Neighbourhood or locality (e.g. "Mozang")
    pub area: Option<String>,
    /// City (e.g. "Lahore")
    pub city: Option<String>,
    /// State or province
    pub state: Option<String>,
    /// Country; the sentinel value "unknown" is skipped when formatting
    pub country: Option<String>,
}

impl UserLocation {
    /// Synthesize a display address by joining `area`, `city` (only when
    /// distinct from `area`), `state`, and `country` (only when not the
    /// "unknown" sentinel) with ", ".
    pub fn to_address_string(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(area) = self.area.as_deref() {
            parts.push(area);
        }
        if let Some(city) = self.city.as_deref() {
            if self.area.as_deref() != Some(city) {
                parts.push(city);
            }
        }
        if let Some(state) = self.state.as_deref() {
            parts.push(state);
        }
        if let Some(country) = self.country.as_deref() {
            if country != "unknown" {
                parts.push(country);
            }
        }
        parts.join(", ")
    }
}

/// Application state shared across API handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub extractor: Arc<extractor::Extractor>,
    pub started_at: std::time::Instant,
}
