//! Text processing for the clinical text classifiers.
//!
//! - [`tokenize`]: bag-of-words tokenization shared by training and prediction

pub mod tokenize;

pub use tokenize::ClinicalTokenizer;

/// Splits text into tokens.
///
/// Training and prediction must use the same tokenizer, otherwise token counts
/// learned at training time never match the tokens seen at prediction time.
pub trait Tokenizer {
    /// Tokenizes `text`. Never returns empty tokens.
    fn tokenize(&self, text: &str) -> Vec<String>;
}
