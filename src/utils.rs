//! # Utilities Module
//!
//! ## Purpose
//! Common utility functions and helpers used throughout the extraction engine
//! for text cleanup, performance timing, and request validation.
//!
//! ## Input/Output Specification
//! - **Input**: Raw utterance fragments and captured phrases
//! - **Output**: Normalized text, trimmed captures, timing measurements
//! - **Functions**: Text utilities, performance helpers, validation functions

use std::time::Instant;
use unicode_normalization::UnicodeNormalization;

/// Performance timer for measuring operation duration
pub struct Timer {
    start: Instant,
    name: String,
}

/// Text processing utilities
pub struct TextUtils;

/// Validation utilities
pub struct ValidationUtils;

impl Timer {
    /// Start a new timer with a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Stop timer and log duration
    pub fn stop(self) -> u64 {
        let elapsed = self.elapsed_ms();
        tracing::debug!("Timer '{}' completed in {}ms", self.name, elapsed);
        elapsed
    }
}

impl TextUtils {
    /// Normalize an utterance before matching: NFC normalization, control
    /// character removal, and whitespace collapsing. Case is preserved since
    /// every pattern in the catalog matches case-insensitively.
    pub fn normalize_utterance(text: &str, apply_nfc: bool) -> String {
        let text: String = if apply_nfc {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        let filtered: String = text
            .chars()
            .filter(|&c| c.is_whitespace() || !c.is_control())
            .collect();

        Self::collapse_whitespace(&filtered)
    }

    /// Collapse runs of whitespace into single spaces and trim
    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Trim trailing punctuation and politeness markers ("please") from the
    /// tail of a captured location phrase.
    pub fn trim_location_tail(capture: &str) -> String {
        let mut phrase = capture.trim().trim_end_matches(['.', ',', '!', '?']).trim();
        if let Some(stripped) = Self::strip_word_suffix(phrase, "please") {
            phrase = stripped;
        }
        phrase
            .trim()
            .trim_end_matches(['.', ',', '!', '?'])
            .trim()
            .to_string()
    }

    /// Strip a trailing whole word, case-insensitively
    fn strip_word_suffix<'a>(text: &'a str, word: &str) -> Option<&'a str> {
        let text = text.trim_end();
        if text.len() < word.len() || !text.is_char_boundary(text.len() - word.len()) {
            return None;
        }
        let (head, tail) = text.split_at(text.len() - word.len());
        if tail.eq_ignore_ascii_case(word) && (head.is_empty() || head.ends_with(char::is_whitespace))
        {
            Some(head)
        } else {
            None
        }
    }

    /// Truncate text to at most `max_length` bytes with ellipsis, for log
    /// previews. The cut is moved back to the nearest character boundary so
    /// multibyte input can never panic the caller.
    pub fn truncate(text: &str, max_length: usize) -> String {
        if text.len() <= max_length {
            return text.to_string();
        }
        let mut cut = max_length.saturating_sub(3);
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &text[..cut])
    }
}

impl ValidationUtils {
    /// Check that an utterance is acceptable for extraction at the API
    /// boundary. The extractor itself accepts anything; this only guards
    /// against empty and oversized payloads.
    pub fn is_valid_query(query: &str, max_length: usize) -> bool {
        let trimmed = query.trim();
        !trimmed.is_empty() && trimmed.len() <= max_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(TextUtils::collapse_whitespace("  a   b  "), "a b");
        assert_eq!(TextUtils::collapse_whitespace("plumber\t service"), "plumber service");
    }

    #[test]
    fn test_normalize_utterance() {
        assert_eq!(
            TextUtils::normalize_utterance("umm   i need\tplumber", true),
            "umm i need plumber"
        );
    }

    #[test]
    fn test_trim_location_tail() {
        assert_eq!(TextUtils::trim_location_tail("Mozang, Lahore."), "Mozang, Lahore");
        assert_eq!(TextUtils::trim_location_tail("Lahore please"), "Lahore");
        assert_eq!(TextUtils::trim_location_tail("Lahore, please!"), "Lahore");
        // "please" only strips as a whole word
        assert_eq!(TextUtils::trim_location_tail("Pleasanton"), "Pleasanton");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(TextUtils::truncate("Hello world", 20), "Hello world");
        assert_eq!(TextUtils::truncate("This is a very long text", 10), "This is...");
    }

    #[test]
    fn test_truncate_respects_multibyte_boundaries() {
        // 160 bytes of two-byte characters; a byte-offset cut of 117 would
        // land mid-character.
        let long = "é".repeat(80);
        let preview = TextUtils::truncate(&long, 120);
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= 120);
        assert_eq!(preview.trim_end_matches('.'), "é".repeat(58));

        // Cut point collapsing to zero must not underflow
        assert_eq!(TextUtils::truncate("日本語", 2), "...");
    }

    #[test]
    fn test_query_validation() {
        assert!(ValidationUtils::is_valid_query("i need a plumber", 100));
        assert!(!ValidationUtils::is_valid_query("   ", 100));
        assert!(!ValidationUtils::is_valid_query("x".repeat(200).as_str(), 100));
    }
}
