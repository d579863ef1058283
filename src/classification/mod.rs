//! Text classification.
//!
//! This module implements multinomial Naive Bayes over bag-of-words tokens
//! with Laplace (add-one) smoothing, used to triage alert priority and to
//! label medical-record types.
//!
//! # Example
//!
//! ```
//! use clinical_decision::classification::TextClassifier;
//!
//! let mut model = TextClassifier::new();
//! model.train("Critical", "cardiac arrest code blue");
//! model.train("Low", "extra blanket requested");
//!
//! let result = model.predict("code blue in room 4");
//! assert_eq!(result.label, "Critical");
//! let total: f64 = result.scores.values().sum();
//! assert!((total - 1.0).abs() < 1e-9);
//! ```

pub mod seeds;

use crate::error::{EngineError, Result};
use crate::text::{ClinicalTokenizer, Tokenizer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

pub use seeds::{alert_priority_corpus, medical_record_corpus};

/// A single `(label, text)` training pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Class label
    pub label: String,
    /// Raw document text
    pub text: String,
}

impl TrainingExample {
    /// Creates a training example.
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Loads a YAML list of `{label, text}` training examples.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid corpus.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<TrainingExample>> {
    let raw = fs::read_to_string(path.as_ref())?;
    let corpus: Vec<TrainingExample> = serde_yaml::from_str(&raw)?;
    if corpus.is_empty() {
        return Err(format!("corpus {} is empty", path.as_ref().display()).into());
    }
    Ok(corpus)
}

/// Result of classifying one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Arg-max label, or `""` when the model has no labels
    pub label: String,
    /// Posterior probability for every known label
    pub scores: BTreeMap<String, f64>,
}

impl Classification {
    /// The sentinel returned by an untrained model.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            label: String::new(),
            scores: BTreeMap::new(),
        }
    }

    /// Returns true for the untrained-model sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.label.is_empty() && self.scores.is_empty()
    }

    /// Posterior probability of the chosen label.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.scores.get(&self.label).copied().unwrap_or(0.0)
    }
}

/// Token and document counts learned from training.
///
/// Counts only grow; `total_docs` always equals the sum of label document
/// counts. Labels are kept in first-trained order, which fixes how exact
/// score ties are broken.
#[derive(Debug, Clone, Default)]
pub struct ClassifierModel {
    /// Labels in order of first `train` call
    labels: Vec<String>,
    /// Documents seen per label
    label_counts: HashMap<String, u64>,
    /// Token occurrence counts per label
    token_counts_by_label: HashMap<String, HashMap<String, u64>>,
    /// Total token occurrences per label
    token_totals_by_label: HashMap<String, u64>,
    /// Every token seen under any label
    vocabulary: HashSet<String>,
    /// Documents seen overall
    total_docs: u64,
}

impl ClassifierModel {
    /// Labels in enumeration (first-trained) order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of training documents seen for `label`.
    #[must_use]
    pub fn label_count(&self, label: &str) -> u64 {
        self.label_counts.get(label).copied().unwrap_or(0)
    }

    /// Occurrences of `token` under `label`.
    #[must_use]
    pub fn token_count(&self, label: &str, token: &str) -> u64 {
        self.token_counts_by_label
            .get(label)
            .and_then(|counts| counts.get(token))
            .copied()
            .unwrap_or(0)
    }

    /// Total token occurrences under `label`.
    #[must_use]
    pub fn token_total(&self, label: &str) -> u64 {
        self.token_totals_by_label.get(label).copied().unwrap_or(0)
    }

    /// Number of distinct tokens seen across all labels.
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Returns true if `token` has been seen under any label.
    #[must_use]
    pub fn in_vocabulary(&self, token: &str) -> bool {
        self.vocabulary.contains(token)
    }

    /// Documents seen overall.
    #[must_use]
    pub fn total_docs(&self) -> u64 {
        self.total_docs
    }

    fn record(&mut self, label: &str, tokens: Vec<String>) {
        if !self.label_counts.contains_key(label) {
            self.labels.push(label.to_string());
        }
        *self.label_counts.entry(label.to_string()).or_insert(0) += 1;
        self.total_docs += 1;

        let counts = self
            .token_counts_by_label
            .entry(label.to_string())
            .or_default();
        let total = self
            .token_totals_by_label
            .entry(label.to_string())
            .or_insert(0);
        for token in tokens {
            *total += 1;
            *counts.entry(token.clone()).or_insert(0) += 1;
            self.vocabulary.insert(token);
        }
    }

    /// Unnormalized log posterior of `label` for the given tokens.
    fn log_score(&self, label: &str, tokens: &[String]) -> f64 {
        let log_prior = (self.label_count(label) as f64 / self.total_docs as f64).ln();

        let denominator = (self.token_total(label) + self.vocabulary.len() as u64).max(1) as f64;
        let log_likelihood: f64 = tokens
            .iter()
            .map(|token| ((self.token_count(label, token) + 1) as f64 / denominator).ln())
            .sum();

        log_prior + log_likelihood
    }
}

/// Multinomial Naive Bayes text classifier.
///
/// Train once at startup, then share by reference: `predict` takes `&self`
/// and is safe to call from many threads. `train` takes `&mut self`, so
/// retraining while predictions are served requires external locking.
#[derive(Debug, Clone, Default)]
pub struct TextClassifier<T: Tokenizer = ClinicalTokenizer> {
    model: ClassifierModel,
    tokenizer: T,
}

impl TextClassifier {
    /// Creates an untrained classifier using [`ClinicalTokenizer`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a classifier trained on every example of `corpus`, in order.
    pub fn from_corpus<'a, I>(corpus: I) -> Self
    where
        I: IntoIterator<Item = &'a TrainingExample>,
    {
        let mut classifier = Self::new();
        for example in corpus {
            classifier.train(&example.label, &example.text);
        }
        classifier
    }
}

impl<T: Tokenizer> TextClassifier<T> {
    /// Creates an untrained classifier with a custom tokenizer.
    pub fn with_tokenizer(tokenizer: T) -> Self {
        Self {
            model: ClassifierModel::default(),
            tokenizer,
        }
    }

    /// Adds one labelled document to the counts.
    ///
    /// Training is append-only: there is no deletion or decay.
    pub fn train(&mut self, label: &str, text: &str) {
        let tokens = self.tokenizer.tokenize(text);
        self.model.record(label, tokens);
    }

    /// Learned counts.
    #[must_use]
    pub fn model(&self) -> &ClassifierModel {
        &self.model
    }

    /// Returns true if at least one label has been trained.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        !self.model.labels.is_empty()
    }

    /// Classifies `text`.
    ///
    /// Returns the arg-max label and a probability for every known label,
    /// summing to 1. Tokens never seen in training still contribute their
    /// smoothed probability. Exact ties go to the label trained first.
    ///
    /// An untrained model returns [`Classification::empty`] rather than an
    /// error; see [`TextClassifier::try_predict`] for the strict variant.
    #[must_use]
    pub fn predict(&self, text: &str) -> Classification {
        if !self.is_trained() {
            return Classification::empty();
        }

        let tokens = self.tokenizer.tokenize(text);
        let log_scores: Vec<f64> = self
            .model
            .labels
            .iter()
            .map(|label| self.model.log_score(label, &tokens))
            .collect();

        // Softmax with the max subtracted for numerical stability
        let max_log = log_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp_scores: Vec<f64> = log_scores.iter().map(|s| (s - max_log).exp()).collect();
        let sum: f64 = exp_scores.iter().sum();

        let mut best = 0;
        for (idx, score) in exp_scores.iter().enumerate() {
            if *score > exp_scores[best] {
                best = idx;
            }
        }

        let scores = self
            .model
            .labels
            .iter()
            .zip(&exp_scores)
            .map(|(label, score)| (label.clone(), score / sum))
            .collect();

        let label = self.model.labels[best].clone();
        tracing::debug!(label = %label, tokens = tokens.len(), "classified text");

        Classification { label, scores }
    }

    /// Classifies `text`, failing instead of returning the empty sentinel.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoTrainedLabels`] if no label has been trained.
    pub fn try_predict(&self, text: &str) -> Result<Classification> {
        if !self.is_trained() {
            return Err(EngineError::NoTrainedLabels);
        }
        Ok(self.predict(text))
    }
}
