//! # Extraction Pipeline Module
//!
//! ## Purpose
//! The structured service-request extractor: consumes one free-text utterance
//! and an optional previously resolved user location, and produces a
//! `(service, location)` pair. Owns the matching order, the stoplist cleaning
//! pass, and the location-fallback resolution.
//!
//! ## Input/Output Specification
//! - **Input**: Utterance text (arbitrary case, fillers, punctuation), optional `UserLocation`
//! - **Output**: `ExtractionResult`; unmatched fields are empty strings, never an error
//! - **Performance**: Pure synchronous matching, deterministic for identical inputs
//!
//! ## Pipeline
//! 1. Service pass: ordered service patterns, first non-empty capture wins
//! 2. Cleaning pass: qualifier stoplist removal on whatever phrase was captured
//! 3. Location pass: reuse the full-query capture, else standalone patterns
//! 4. Fallback resolution: self-reference substitution and silent fallback,
//!    as two independent guards

use crate::config::ExtractionConfig;
use crate::errors::Result;
use crate::patterns::{self, LocationRole, PatternCatalog, SELF_REFERENCE_LOCATION};
use crate::utils::TextUtils;
use crate::UserLocation;
use serde::{Deserialize, Serialize};

/// Structured result of one extraction. Freshly constructed per call; both
/// fields default to empty when no pattern matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Requested service category (e.g. "plumber"), empty when unknown
    pub service: String,
    /// Where the service is needed, empty when unknown
    pub location: String,
}

/// The extraction engine. Compiles the pattern catalog once; `extract` is
/// pure and safe to call concurrently.
pub struct Extractor {
    catalog: PatternCatalog,
    config: ExtractionConfig,
}

impl Extractor {
    /// Create a new extractor, compiling the pattern catalog
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        Ok(Self {
            catalog: PatternCatalog::new()?,
            config,
        })
    }

    /// Extract a `(service, location)` pair from an utterance.
    ///
    /// Never fails: malformed or nonsensical input degrades to empty-string
    /// fields. Callers must treat an empty field as "unknown", not an error.
    pub fn extract(&self, query: &str, user_location: Option<&UserLocation>) -> ExtractionResult {
        let query = TextUtils::normalize_utterance(query, self.config.normalize_unicode);
        tracing::debug!(query = %TextUtils::truncate(&query, 120), "extracting service request");

        let service = self.extract_service(&query);
        let mut location = self.extract_location(&query);

        // A capture that is itself a bare self-reference ("near me" captures
        // "me") must resolve like the whole-phrase form.
        if patterns::is_bare_self_reference(&location) {
            location = SELF_REFERENCE_LOCATION.to_string();
        }

        // Fallback resolution runs as two independent guards, not an
        // if/else, so future sentinel phrases cannot suppress either rule.

        // Guard 1: substitute self-reference phrases with the known user
        // location. Without context the phrase passes through unresolved.
        if location.eq_ignore_ascii_case(SELF_REFERENCE_LOCATION)
            || location.eq_ignore_ascii_case(patterns::MY_AREA_SENTINEL)
        {
            if let Some(context) = user_location {
                location = context.to_address_string();
                tracing::debug!(location = %location, "substituted self-reference with user location");
            } else {
                tracing::debug!("self-reference location with no user context, passing through");
            }
        }

        // Guard 2: silent fallback when the utterance omits a location but
        // the caller supplied one earlier in the conversation.
        if location.is_empty() {
            if let Some(context) = user_location {
                location = context.to_address_string();
                tracing::debug!(location = %location, "using user location as fallback");
            }
        }

        ExtractionResult { service, location }
    }

    /// Run the ordered service patterns; the first non-empty capture wins and
    /// no further pattern is attempted.
    fn extract_service(&self, query: &str) -> String {
        for pattern in &self.catalog.service {
            let Some(caps) = pattern.regex.captures(query) else {
                continue;
            };
            let Some(capture) = caps.get(pattern.service_group) else {
                continue;
            };
            let raw = capture.as_str();
            if raw.trim().is_empty() {
                continue;
            }
            let service = self.clean_service_phrase(raw);
            tracing::debug!(pattern = pattern.name, service = %service, "service pattern matched");
            return service;
        }

        String::new()
    }

    /// Three-tier location resolution: reuse the full-query capture, else run
    /// the standalone location patterns, else leave empty for fallback.
    fn extract_location(&self, query: &str) -> String {
        // Tier 1: the full-query pattern already isolated the location;
        // reusing it avoids an inconsistent second derivation.
        let full_query = self.catalog.full_query();
        if let Some(group) = full_query.location_group {
            if let Some(caps) = full_query.regex.captures(query) {
                if let Some(capture) = caps.get(group) {
                    let location = TextUtils::trim_location_tail(capture.as_str());
                    if !location.is_empty() {
                        tracing::debug!(location = %location, "location reused from full-query pattern");
                        return location;
                    }
                }
            }
        }

        // Tier 2: standalone patterns, first match wins
        for pattern in &self.catalog.location {
            match pattern.role {
                LocationRole::Captured => {
                    let Some(caps) = pattern.regex.captures(query) else {
                        continue;
                    };
                    let Some(capture) = caps.get(1) else {
                        continue;
                    };
                    let location = TextUtils::trim_location_tail(capture.as_str());
                    if !location.is_empty() {
                        tracing::debug!(pattern = pattern.name, location = %location, "location pattern matched");
                        return location;
                    }
                }
                LocationRole::SelfReference => {
                    if pattern.regex.is_match(query) {
                        tracing::debug!(pattern = pattern.name, "self-reference location matched");
                        return SELF_REFERENCE_LOCATION.to_string();
                    }
                }
            }
        }

        // Tier 3: unresolved, left for fallback
        String::new()
    }

    /// Remove qualifier stopwords from a captured service phrase, as whole
    /// words, case-insensitively, then collapse whitespace and trim. Applied
    /// uniformly after any pattern match; idempotent.
    fn clean_service_phrase(&self, raw: &str) -> String {
        let cleaned: Vec<&str> = raw
            .split_whitespace()
            .filter(|word| {
                let word = word.trim_matches(|c: char| !c.is_alphanumeric());
                !self
                    .config
                    .qualifier_stoplist
                    .iter()
                    .any(|stop| stop.eq_ignore_ascii_case(word))
            })
            .collect();

        cleaned.join(" ")
    }
}
