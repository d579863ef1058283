//! Engine configuration.
//!
//! Loaded from YAML. Every field has a default, so an empty document is a
//! valid configuration that uses the built-in corpora and shipped trees.
//!
//! ```yaml
//! similarity:
//!   default_k: 3
//!   metric: cosine
//!   explain_tolerance: 0.05
//! classifier:
//!   alert_corpus: corpora/alerts.yaml
//! trees:
//!   discharge_readiness: trees/discharge.yaml
//! ```

use crate::error::{EngineError, Result};
use crate::neighbors::{DistanceMetric, DEFAULT_EXPLAIN_TOLERANCE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// KNN settings
    pub similarity: SimilarityConfig,
    /// Classifier corpora
    pub classifier: ClassifierConfig,
    /// Rule tree sources
    pub trees: TreeConfig,
}

/// KNN settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimilarityConfig {
    /// Neighbors returned when the caller does not pass `k`
    pub default_k: usize,
    /// Metric for unweighted ranking
    pub metric: DistanceMetric,
    /// Largest difference explained as "similar"
    pub explain_tolerance: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            default_k: 5,
            metric: DistanceMetric::Euclidean,
            explain_tolerance: DEFAULT_EXPLAIN_TOLERANCE,
        }
    }
}

/// Training corpora overriding the built-in seeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// YAML list of `{label, text}` for alert priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_corpus: Option<PathBuf>,
    /// YAML list of `{label, text}` for medical record type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_corpus: Option<PathBuf>,
}

/// Tree files overriding the shipped trees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
    /// Care-path tree arena
    #[serde(skip_serializing_if = "Option::is_none")]
    pub care_path: Option<PathBuf>,
    /// Discharge-readiness tree arena
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discharge_readiness: Option<PathBuf>,
}

impl EngineConfig {
    /// Parses and validates a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a value is out of range.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loading engine config");
        Self::from_yaml_str(&raw)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] for the first bad value.
    pub fn validate(&self) -> Result<()> {
        let similarity = &self.similarity;
        if similarity.default_k == 0 {
            return Err(EngineError::invalid_config(
                "similarity.default_k",
                similarity.default_k,
                ">= 1",
            ));
        }
        if !similarity.explain_tolerance.is_finite() || similarity.explain_tolerance < 0.0 {
            return Err(EngineError::invalid_config(
                "similarity.explain_tolerance",
                similarity.explain_tolerance,
                "finite and >= 0",
            ));
        }
        Ok(())
    }
}
