//! Bag-of-words tokenization.
//!
//! [`ClinicalTokenizer`] lowercases, deletes every character that is neither
//! an ASCII letter, an ASCII digit, nor whitespace, then splits on whitespace.
//! Punctuation is removed rather than treated as a separator, so `"X-Ray"`
//! becomes the single token `"xray"`.

use crate::text::Tokenizer;

/// Normalizing whitespace tokenizer.
///
/// # Examples
///
/// ```
/// use clinical_decision::text::{ClinicalTokenizer, Tokenizer};
///
/// let tokenizer = ClinicalTokenizer::new();
/// let tokens = tokenizer.tokenize("CODE Blue! Room 12-B");
/// assert_eq!(tokens, vec!["code", "blue", "room", "12b"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ClinicalTokenizer;

impl ClinicalTokenizer {
    /// Create a new tokenizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for ClinicalTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
            .collect();

        cleaned.split_whitespace().map(ToString::to_string).collect()
    }
}
