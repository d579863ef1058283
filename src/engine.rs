//! The assembled decision-support engine.
//!
//! [`ClinicalEngine`] is built once at startup from an [`EngineConfig`]:
//! classifiers are trained, trees are loaded and validated, and a bad tree
//! or corpus fails construction. After that the engine is immutable and
//! every method takes `&self`, so one instance can be shared across threads
//! (for example behind an `Arc`) without locking.
//!
//! # Example
//!
//! ```
//! use clinical_decision::engine::ClinicalEngine;
//!
//! let engine = ClinicalEngine::with_defaults().expect("shipped models are valid");
//! let alert = engine.classify_alert_priority(Some("Code blue"), Some("emergency cardiac arrest"));
//! assert_eq!(alert.label, "Critical");
//! ```

use crate::classification::{
    alert_priority_corpus, load_corpus, medical_record_corpus, Classification, TextClassifier,
    TrainingExample,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::neighbors::{self, DistanceMetric, Neighbor, SimilarityCandidate, SimilarityEngine};
use crate::primitives::FeatureVector;
use crate::tree::{self, DecisionResult, RuleTree, TreeSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Which shipped decision tree to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeKind {
    /// Care-path routing
    CarePath,
    /// Discharge readiness
    DischargeReadiness,
}

impl FromStr for TreeKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "care_path" => Ok(TreeKind::CarePath),
            "discharge_readiness" | "discharge" => Ok(TreeKind::DischargeReadiness),
            other => Err(format!("unknown tree '{other}'").into()),
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeKind::CarePath => f.write_str("care_path"),
            TreeKind::DischargeReadiness => f.write_str("discharge_readiness"),
        }
    }
}

/// Trained classifiers, validated trees, and the configured KNN ranker.
#[derive(Debug, Clone)]
pub struct ClinicalEngine {
    alert_classifier: TextClassifier,
    record_classifier: TextClassifier,
    care_path: RuleTree,
    discharge_readiness: RuleTree,
    similarity: SimilarityEngine,
}

impl ClinicalEngine {
    /// Builds the engine from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured corpus or tree file cannot be loaded,
    /// a tree fails validation, or the configuration is out of range.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        let alert_classifier = build_classifier(
            "alert_priority",
            config.classifier.alert_corpus.as_deref(),
            alert_priority_corpus,
        )?;
        let record_classifier = build_classifier(
            "medical_record",
            config.classifier.record_corpus.as_deref(),
            medical_record_corpus,
        )?;

        let care_path = match &config.trees.care_path {
            Some(path) => tree::load_tree(path)?,
            None => tree::care_path_tree()?,
        };
        let discharge_readiness = match &config.trees.discharge_readiness {
            Some(path) => tree::load_tree(path)?,
            None => tree::discharge_readiness_tree()?,
        };

        let similarity = SimilarityEngine::new(config.similarity.default_k)
            .with_metric(config.similarity.metric)
            .with_explain_tolerance(config.similarity.explain_tolerance);

        tracing::info!(
            default_k = similarity.k(),
            metric = ?similarity.metric(),
            "clinical engine ready"
        );

        Ok(Self {
            alert_classifier,
            record_classifier,
            care_path,
            discharge_readiness,
            similarity,
        })
    }

    /// Builds the engine with seed corpora and shipped trees.
    ///
    /// # Errors
    ///
    /// Returns an error only if a shipped tree fails validation.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&EngineConfig::default())
    }

    /// Triage priority for an alert (`Critical`, `High`, `Medium`, `Low`).
    ///
    /// Absent parts are skipped; title and message are classified as one text.
    #[must_use]
    pub fn classify_alert_priority(
        &self,
        title: Option<&str>,
        message: Option<&str>,
    ) -> Classification {
        self.alert_classifier.predict(&join_text(&[title, message]))
    }

    /// Medical record type from its title, summary, and diagnosis.
    #[must_use]
    pub fn classify_medical_record_type(
        &self,
        title: Option<&str>,
        summary: Option<&str>,
        diagnosis: Option<&str>,
    ) -> Classification {
        self.record_classifier
            .predict(&join_text(&[title, summary, diagnosis]))
    }

    /// Unnormalized KNN over caller-prepared vectors.
    #[must_use]
    pub fn find_knn<'a, T>(
        &self,
        target: &FeatureVector,
        candidates: &'a [SimilarityCandidate<T>],
        k: usize,
        metric: DistanceMetric,
    ) -> Vec<Neighbor<'a, T>> {
        neighbors::find_knn(target, candidates, k, metric)
    }

    /// Unnormalized weighted Euclidean KNN over caller-prepared vectors.
    #[must_use]
    pub fn find_weighted_knn<'a, T>(
        &self,
        target: &FeatureVector,
        candidates: &'a [SimilarityCandidate<T>],
        k: usize,
        weights: &BTreeMap<String, f64>,
    ) -> Vec<Neighbor<'a, T>> {
        neighbors::find_weighted_knn(target, candidates, k, weights)
    }

    /// Configured ranker (normalizes the batch, uses the default `k`).
    #[must_use]
    pub fn similarity(&self) -> &SimilarityEngine {
        &self.similarity
    }

    /// Runs the care-path tree.
    #[must_use]
    pub fn care_path(&self, features: &FeatureVector) -> DecisionResult {
        self.care_path.predict(features)
    }

    /// Runs the discharge-readiness tree.
    #[must_use]
    pub fn discharge_readiness(&self, features: &FeatureVector) -> DecisionResult {
        self.discharge_readiness.predict(features)
    }

    /// The validated tree for `kind`.
    #[must_use]
    pub fn tree(&self, kind: TreeKind) -> &RuleTree {
        match kind {
            TreeKind::CarePath => &self.care_path,
            TreeKind::DischargeReadiness => &self.discharge_readiness,
        }
    }

    /// Runs the tree for `kind`.
    #[must_use]
    pub fn decide(&self, kind: TreeKind, features: &FeatureVector) -> DecisionResult {
        self.tree(kind).predict(features)
    }

    /// Independent copy of the tree for `kind`.
    #[must_use]
    pub fn export_tree(&self, kind: TreeKind) -> TreeSnapshot {
        self.tree(kind).export_tree()
    }
}

fn build_classifier(
    name: &str,
    corpus_path: Option<&Path>,
    seeds: fn() -> Vec<TrainingExample>,
) -> Result<TextClassifier> {
    let corpus = match corpus_path {
        Some(path) => load_corpus(path)?,
        None => seeds(),
    };
    let classifier = TextClassifier::from_corpus(&corpus);
    let model = classifier.model();
    tracing::info!(
        classifier = name,
        labels = model.labels().len(),
        documents = model.total_docs(),
        vocabulary = model.vocabulary_size(),
        "trained text classifier"
    );
    Ok(classifier)
}

fn join_text(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .flatten()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
