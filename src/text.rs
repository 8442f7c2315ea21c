//! Text-cleaning boundary.
//!
//! Cleaning and part-of-speech extraction happen outside this crate; the
//! ensemble only ever sees already-cleaned text. These types pin down the
//! contract: `text` feeds arbitration, `descriptors` (the adjectives and
//! adverbs the cleaner pulled out) pass through untouched for the caller to
//! surface alongside the verdict.

use crate::error::Result;

/// Output of the external cleaning pipeline for one raw review.
#[derive(Debug, Clone)]
pub struct CleanedReview {
    /// Cleaned text, ready for feature extraction.
    pub text: String,
    /// Adjectives and adverbs extracted by the cleaner, in order. Never
    /// consulted by arbitration.
    pub descriptors: Vec<String>,
}

/// Cleans one raw review into [`CleanedReview`].
pub trait TextCleaner: Send + Sync {
    /// Clean raw text.
    fn clean(&self, raw_text: &str) -> Result<CleanedReview>;
}

/// A minimal cleaner: lowercases, strips everything but letters, digits and
/// whitespace, and collapses runs of whitespace.
///
/// It extracts no descriptors; part-of-speech tagging belongs to external
/// tooling.
#[derive(Debug, Clone, Default)]
pub struct BasicCleaner;

impl BasicCleaner {
    /// Create a cleaner.
    pub fn new() -> Self {
        Self
    }
}

impl TextCleaner for BasicCleaner {
    fn clean(&self, raw_text: &str) -> Result<CleanedReview> {
        let mut text = String::with_capacity(raw_text.len());
        let mut last_was_space = true;
        for c in raw_text.chars() {
            if c.is_alphanumeric() {
                text.extend(c.to_lowercase());
                last_was_space = false;
            } else if c.is_whitespace() && !last_was_space {
                text.push(' ');
                last_was_space = true;
            }
        }
        while text.ends_with(' ') {
            text.pop();
        }
        Ok(CleanedReview {
            text,
            descriptors: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        let cleaned = BasicCleaner::new().clean("Great movie!!  Loved it.").unwrap();
        assert_eq!(cleaned.text, "great movie loved it");
        assert!(cleaned.descriptors.is_empty());
    }

    #[test]
    fn empty_input_stays_empty() {
        let cleaned = BasicCleaner::new().clean("   ").unwrap();
        assert_eq!(cleaned.text, "");
    }
}
