//! # Pattern Catalog Module
//!
//! ## Purpose
//! The ordered, prioritized pattern catalog used by the extraction pipeline.
//! Patterns are kept as an explicit list of matchers with named capture roles
//! rather than a single combined expression, so that priority and capture
//! semantics stay legible and individually testable.
//!
//! ## Matching Order
//! Service patterns, first match wins:
//! 1. Full query with embedded location (yields service AND location atomically)
//! 2. Casual phrasing with filler words
//! 3. Direct service mention with trailing locative boundary
//! 4. Minimal single-word service request
//!
//! Standalone location patterns, first match wins: `near`, `close to`,
//! `around`, `at`, `in`, then the closed self-referential set ("near me",
//! "my area", "here", ...) which resolves to the literal `"near me"`.

use crate::errors::{ExtractorError, Result};
use regex::Regex;

/// Canonical value for a location expression referring to the user's own
/// position. Fallback resolution substitutes it with the caller-supplied
/// user location when available.
pub const SELF_REFERENCE_LOCATION: &str = "near me";

/// Sentinel phrase left intact by location capture and substituted during
/// fallback resolution, alongside [`SELF_REFERENCE_LOCATION`].
pub const MY_AREA_SENTINEL: &str = "my area";

/// A service pattern with its capture roles
pub struct ServicePattern {
    /// Short name used in logs and tests
    pub name: &'static str,
    /// Compiled matcher
    pub regex: Regex,
    /// Capture group index holding the service phrase
    pub service_group: usize,
    /// Capture group index holding the location phrase, when the pattern
    /// extracts both fields atomically
    pub location_group: Option<usize>,
}

/// How a standalone location pattern resolves its match
pub enum LocationRole {
    /// Group 1 captures the location phrase
    Captured,
    /// Whole-phrase match resolving to [`SELF_REFERENCE_LOCATION`]
    SelfReference,
}

/// A standalone location pattern
pub struct LocationPattern {
    /// Short name used in logs and tests
    pub name: &'static str,
    /// Compiled matcher
    pub regex: Regex,
    /// Capture role
    pub role: LocationRole,
}

/// Compiled catalog of service and location patterns, tried strictly in order
pub struct PatternCatalog {
    pub service: Vec<ServicePattern>,
    pub location: Vec<LocationPattern>,
}

impl PatternCatalog {
    /// Compile the full catalog
    pub fn new() -> Result<Self> {
        let service = vec![
            // Verb of request, optional article and "local", service phrase,
            // locative preposition, location phrase. Extracting both fields
            // in one pass keeps the split consistent.
            ServicePattern {
                name: "full_query_with_location",
                regex: compile(
                    "full_query_with_location",
                    r"(?i)(?:i\s+)?(?:need|want|looking\s+for|find|get\s+me|hire|book)\s+(?:an|a)?\s*(?:local\s+)?([a-zA-Z\s]+?)\s+(?:in|near|close\s+to|at|around)\s+(.+?)(?:\.|\s+please\b|\s+specifically\b|$)",
                )?,
                service_group: 1,
                location_group: Some(2),
            },
            // Leading hesitation marker, softer verb set, capture up to end
            // of string or a locative preposition. Location is intentionally
            // not captured here.
            ServicePattern {
                name: "casual_with_filler",
                regex: compile(
                    "casual_with_filler",
                    r"(?i)(?:umm|uh|well|actually|so)?\s*(?:i\s+)?(?:need|want|looking\s+for|require)\s+(?:an|a)?\s*([a-zA-Z\s]+?)(?:\s*$|\s+in\b|\s+near\b|\s+close\b|\s+around\b)",
                )?,
                service_group: 1,
                location_group: None,
            },
            // Broader verb set for free-form phrasing, capture everything up
            // to a locative preposition or end of string.
            ServicePattern {
                name: "direct_service_mention",
                regex: compile(
                    "direct_service_mention",
                    r"(?i)(?:i\s+)?(?:need|want|looking\s+for|find|get\s+me|hire|book)\s+(?:an|a)?\s*(?:local\s+)?([^.]+?)(?:\s+(?:in|near|close\s+to|at|around)\b|$)",
                )?,
                service_group: 1,
                location_group: None,
            },
            // Last resort for terse input: a single alphabetic token anchored
            // to end of string.
            ServicePattern {
                name: "minimal_request",
                regex: compile(
                    "minimal_request",
                    r"(?i)^(?:umm|uh|well)?\s*(?:i\s+)?(?:need|want|require)\s+(?:an|a)?\s*([a-zA-Z]+)\s*$",
                )?,
                service_group: 1,
                location_group: None,
            },
        ];

        let location = vec![
            LocationPattern {
                name: "near",
                regex: compile("near", r"(?i)\bnear\s+([^.]+?)(?:\s*$|\.|,|\s+please\b)")?,
                role: LocationRole::Captured,
            },
            LocationPattern {
                name: "close_to",
                regex: compile(
                    "close_to",
                    r"(?i)\bclose\s+to\s+([^.]+?)(?:\s*$|\.|,|\s+please\b)",
                )?,
                role: LocationRole::Captured,
            },
            LocationPattern {
                name: "around",
                regex: compile("around", r"(?i)\baround\s+([^.]+?)(?:\s*$|\.|,|\s+please\b)")?,
                role: LocationRole::Captured,
            },
            LocationPattern {
                name: "at",
                regex: compile("at", r"(?i)\bat\s+([^.]+?)(?:\s*$|\.|,|\s+please\b)")?,
                role: LocationRole::Captured,
            },
            LocationPattern {
                name: "in",
                regex: compile(
                    "in",
                    r"(?i)\bin\s+([^.]+?)(?:\s*$|\.|,|\s+please\b|\s+specifically\b)",
                )?,
                role: LocationRole::Captured,
            },
            LocationPattern {
                name: "self_reference",
                regex: compile(
                    "self_reference",
                    r"(?i)\b(?:near\s+me|close\s+to\s+me|around\s+me|my\s+area|here)\b",
                )?,
                role: LocationRole::SelfReference,
            },
        ];

        Ok(Self { service, location })
    }

    /// The top-priority pattern that captures service and location atomically
    pub fn full_query(&self) -> &ServicePattern {
        &self.service[0]
    }
}

/// True when a captured location phrase is itself a bare self-reference
/// ("me" after a preposition, or "here"). Such captures are canonicalized to
/// [`SELF_REFERENCE_LOCATION`] so fallback substitution applies uniformly.
pub fn is_bare_self_reference(phrase: &str) -> bool {
    phrase.eq_ignore_ascii_case("me") || phrase.eq_ignore_ascii_case("here")
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ExtractorError::InvalidPattern {
        name: name.to_string(),
        details: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PatternCatalog {
        PatternCatalog::new().expect("catalog compiles")
    }

    #[test]
    fn test_catalog_compiles() {
        let catalog = catalog();
        assert_eq!(catalog.service.len(), 4);
        assert_eq!(catalog.location.len(), 6);
        assert_eq!(catalog.full_query().name, "full_query_with_location");
    }

    #[test]
    fn test_full_query_captures_both_fields() {
        let catalog = catalog();
        let caps = catalog
            .full_query()
            .regex
            .captures("I need a plumber in Mozang, Lahore")
            .expect("pattern matches");
        assert_eq!(caps.get(1).unwrap().as_str(), "plumber");
        assert_eq!(caps.get(2).unwrap().as_str(), "Mozang, Lahore");
    }

    #[test]
    fn test_full_query_requires_locative_preposition() {
        let catalog = catalog();
        assert!(catalog.full_query().regex.captures("umm i need plumber").is_none());
    }

    #[test]
    fn test_casual_pattern_tolerates_fillers() {
        let catalog = catalog();
        let pattern = &catalog.service[1];
        let caps = pattern.regex.captures("umm i need plumber").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "plumber");

        let caps = pattern.regex.captures("well i need plumber service").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "plumber service");
    }

    #[test]
    fn test_casual_pattern_stops_before_preposition() {
        let catalog = catalog();
        let pattern = &catalog.service[1];
        let caps = pattern.regex.captures("i require a cleaner in Gulberg").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "cleaner");
    }

    #[test]
    fn test_direct_pattern_accepts_hire_and_book() {
        let catalog = catalog();
        let pattern = &catalog.service[2];
        let caps = pattern.regex.captures("book an ac repair technician").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "ac repair technician");
    }

    #[test]
    fn test_minimal_pattern_is_anchored() {
        let catalog = catalog();
        let pattern = &catalog.service[3];
        let caps = pattern.regex.captures("uh i need electrician").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "electrician");
        assert!(pattern.regex.captures("i need electrician today please").is_none());
    }

    #[test]
    fn test_location_capture_trims_at_terminators() {
        let catalog = catalog();
        let near = &catalog.location[0];
        let caps = near.regex.captures("anyone near Johar Town please").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "Johar Town");
    }

    #[test]
    fn test_in_pattern_requires_word_boundary() {
        let catalog = catalog();
        let in_pattern = &catalog.location[4];
        // "in" inside another word must not fire
        assert!(in_pattern.regex.captures("plumbing work").is_none());
        let caps = in_pattern.regex.captures("cleaner in DHA").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "DHA");
    }

    #[test]
    fn test_self_reference_whole_phrases() {
        let catalog = catalog();
        let self_ref = &catalog.location[5];
        for utterance in ["a plumber close to me", "someone around me", "in my area", "here"] {
            assert!(self_ref.regex.is_match(utterance), "should match: {utterance}");
        }
    }

    #[test]
    fn test_bare_self_reference_detection() {
        assert!(is_bare_self_reference("me"));
        assert!(is_bare_self_reference("ME"));
        assert!(is_bare_self_reference("here"));
        assert!(!is_bare_self_reference("Mozang"));
        assert!(!is_bare_self_reference("my area"));
    }
}
