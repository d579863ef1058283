//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use clinical_decision::prelude::*;
//! ```

pub use crate::classification::{Classification, TextClassifier, TrainingExample};
pub use crate::config::EngineConfig;
pub use crate::engine::{ClinicalEngine, TreeKind};
pub use crate::error::{EngineError, Result, TreeError};
pub use crate::neighbors::{
    explain_similarity, find_knn, find_weighted_knn, DistanceMetric, Neighbor,
    SimilarityCandidate, SimilarityEngine,
};
pub use crate::preprocessing::{normalize_features, MinMaxScaler};
pub use crate::primitives::{FeatureValue, FeatureVector, RawFeatures};
pub use crate::traits::Transformer;
pub use crate::tree::{DecisionResult, Operator, RuleTree, TreeNode, TreeSnapshot};
