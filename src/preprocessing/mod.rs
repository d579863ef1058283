//! Preprocessing transformers for feature normalization.
//!
//! Min-max scaling must see the whole comparison batch at once: the target
//! and every candidate share one min/max basis, otherwise distances between
//! them are meaningless.
//!
//! # Example
//!
//! ```
//! use clinical_decision::preprocessing::normalize_features;
//! use clinical_decision::primitives::FeatureVector;
//!
//! let batch = vec![
//!     FeatureVector::new().with("age", 20.0).with("rating", 4.0),
//!     FeatureVector::new().with("age", 40.0).with("rating", 4.0),
//!     FeatureVector::new().with("age", 60.0).with("rating", 4.0),
//! ];
//! let scaled = normalize_features(&batch);
//!
//! assert_eq!(scaled[1].get("age"), 0.5);
//! // Constant feature maps to 0, not NaN
//! assert_eq!(scaled[2].get("rating"), 0.0);
//! ```

use crate::error::{EngineError, Result};
use crate::primitives::FeatureVector;
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Observed range of one feature across a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    /// Smallest value in the batch
    pub min: f64,
    /// Largest value in the batch
    pub max: f64,
}

impl FeatureRange {
    /// Maps `value` into [0, 1]; a degenerate range maps everything to 0.
    ///
    /// Values outside the range clamp to its ends.
    #[must_use]
    pub fn scale(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range.is_nan() || range <= 0.0 {
            return 0.0;
        }
        let scaled = if range.is_finite() {
            (value - self.min) / range
        } else {
            // max - min overflowed; halve every operand first
            (value / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
        };
        scaled.clamp(0.0, 1.0)
    }
}

/// Scales features to [0, 1] using the batch minimum and maximum.
///
/// The feature set is taken from the first vector of the fitted batch.
/// Missing values read as 0 both when fitting and when transforming, and
/// features absent from the first vector are dropped from the output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinMaxScaler {
    /// Per-feature range (computed during fit).
    ranges: Option<BTreeMap<String, FeatureRange>>,
}

impl MinMaxScaler {
    /// Creates an unfitted scaler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.ranges.is_some()
    }

    /// Fitted range for `feature`, if any.
    #[must_use]
    pub fn range(&self, feature: &str) -> Option<FeatureRange> {
        self.ranges.as_ref().and_then(|r| r.get(feature)).copied()
    }

    /// Per-feature ranges keyed by the first vector's features.
    fn compute_ranges(batch: &[FeatureVector]) -> BTreeMap<String, FeatureRange> {
        let Some(first) = batch.first() else {
            return BTreeMap::new();
        };

        first
            .keys()
            .map(|key| {
                let mut range = FeatureRange {
                    min: f64::INFINITY,
                    max: f64::NEG_INFINITY,
                };
                for v in batch {
                    let val = v.get(key);
                    if val < range.min {
                        range.min = val;
                    }
                    if val > range.max {
                        range.max = val;
                    }
                }
                (key.to_string(), range)
            })
            .collect()
    }

    fn scale_all(
        ranges: &BTreeMap<String, FeatureRange>,
        batch: &[FeatureVector],
    ) -> Vec<FeatureVector> {
        batch
            .iter()
            .map(|v| {
                ranges
                    .iter()
                    .map(|(key, range)| (key.as_str(), range.scale(v.get(key))))
                    .collect()
            })
            .collect()
    }
}

impl Transformer for MinMaxScaler {
    /// Computes the min and max of each feature of the first vector.
    fn fit(&mut self, batch: &[FeatureVector]) -> Result<()> {
        if batch.is_empty() {
            return Err("Cannot fit with zero samples".into());
        }
        self.ranges = Some(Self::compute_ranges(batch));
        Ok(())
    }

    /// Scales each vector into [0, 1] relative to the fitted ranges.
    fn transform(&self, batch: &[FeatureVector]) -> Result<Vec<FeatureVector>> {
        let ranges = self
            .ranges
            .as_ref()
            .ok_or_else(|| EngineError::from("Scaler not fitted"))?;
        Ok(Self::scale_all(ranges, batch))
    }
}

/// Min-max normalizes a batch against its own shared ranges.
///
/// Call once over `{target} ∪ candidates`. An empty batch yields an empty
/// result. When every vector holds the same value for a feature, that feature
/// normalizes to exactly 0.
#[must_use]
pub fn normalize_features(batch: &[FeatureVector]) -> Vec<FeatureVector> {
    let ranges = MinMaxScaler::compute_ranges(batch);
    MinMaxScaler::scale_all(&ranges, batch)
}
