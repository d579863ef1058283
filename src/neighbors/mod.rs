//! K-nearest-neighbor similarity ranking.
//!
//! Ranks caller-supplied candidates by distance to a target feature vector.
//! The engine never inspects a candidate's `item`; it hands back a reference
//! to it alongside the distance and a derived similarity score.
//!
//! # Example
//!
//! ```
//! use clinical_decision::neighbors::{find_knn, DistanceMetric, SimilarityCandidate};
//! use clinical_decision::primitives::FeatureVector;
//!
//! let target = FeatureVector::new().with("x", 0.0).with("y", 0.0);
//! let candidates = vec![
//!     SimilarityCandidate::new("far", FeatureVector::new().with("x", 3.0).with("y", 4.0)),
//!     SimilarityCandidate::new("near", FeatureVector::new().with("x", 1.0)),
//! ];
//!
//! let ranked = find_knn(&target, &candidates, 1, DistanceMetric::Euclidean);
//! assert_eq!(ranked.len(), 1);
//! assert_eq!(*ranked[0].item, "near");
//! assert_eq!(ranked[0].similarity, 0.5); // 1 / (1 + 1)
//! ```

use crate::preprocessing::normalize_features;
use crate::primitives::FeatureVector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default tolerance under which two feature values count as similar.
pub const DEFAULT_EXPLAIN_TOLERANCE: f64 = 0.1;

/// Distance metric for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Euclidean distance over the key union; similarity `1 / (1 + d)`
    #[default]
    Euclidean,
    /// Cosine distance `1 - cos`; similarity is the raw cosine
    Cosine,
}

impl std::str::FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "cosine" => Ok(DistanceMetric::Cosine),
            other => Err(format!("unknown metric '{other}' (expected euclidean or cosine)")),
        }
    }
}

/// An opaque item paired with the features used to rank it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityCandidate<T> {
    /// Caller's item, returned untouched
    pub item: T,
    /// Features compared against the target
    pub features: FeatureVector,
}

impl<T> SimilarityCandidate<T> {
    /// Pairs an item with its features.
    pub fn new(item: T, features: FeatureVector) -> Self {
        Self { item, features }
    }
}

/// A ranked candidate.
#[derive(Debug, Serialize)]
pub struct Neighbor<'a, T> {
    /// Position of the candidate in the input slice
    pub index: usize,
    /// The candidate's item
    pub item: &'a T,
    /// Distance to the target (lower is closer)
    pub distance: f64,
    /// Similarity to the target (higher is closer)
    pub similarity: f64,
}

impl<T> Clone for Neighbor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Neighbor<'_, T> {}

/// Euclidean distance over the union of keys; missing keys read as 0.
#[must_use]
pub fn euclidean_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.union_keys(b)
        .into_iter()
        .map(|key| {
            let diff = a.get(key) - b.get(key);
            diff * diff
        })
        .sum::<f64>()
        .sqrt()
}

/// Cosine similarity over the union of keys.
///
/// Returns 0 if either vector has zero magnitude.
#[must_use]
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let dot: f64 = a
        .union_keys(b)
        .into_iter()
        .map(|key| a.get(key) * b.get(key))
        .sum();

    let norm_a = a.magnitude();
    let norm_b = b.magnitude();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0; // Zero vector is orthogonal to everything
    }

    dot / (norm_a * norm_b)
}

/// Computes `(distance, similarity)` for one pair under `metric`.
#[must_use]
pub fn measure(target: &FeatureVector, other: &FeatureVector, metric: DistanceMetric) -> (f64, f64) {
    match metric {
        DistanceMetric::Euclidean => {
            let distance = euclidean_distance(target, other);
            (distance, 1.0 / (1.0 + distance))
        }
        DistanceMetric::Cosine => {
            let similarity = cosine_similarity(target, other);
            (1.0 - similarity, similarity)
        }
    }
}

/// Multiplies every weighted feature present in `features` by its weight.
#[must_use]
pub fn apply_weights(features: &FeatureVector, weights: &BTreeMap<String, f64>) -> FeatureVector {
    let mut weighted = features.clone();
    for (key, weight) in weights {
        if let Some(value) = weighted.value_mut(key) {
            *value *= weight;
        }
    }
    weighted
}

/// Ranks `(index, features)` pairs ascending by distance and keeps `k`.
fn rank<'f>(
    target: &FeatureVector,
    features: impl Iterator<Item = (usize, &'f FeatureVector)>,
    k: usize,
    metric: DistanceMetric,
) -> Vec<(usize, f64, f64)> {
    let mut scored: Vec<(usize, f64, f64)> = features
        .map(|(idx, other)| {
            let (distance, similarity) = measure(target, other, metric);
            (idx, distance, similarity)
        })
        .collect();

    // Stable: equal distances keep input order
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    scored.truncate(k);
    scored
}

fn to_neighbors<T>(
    candidates: &[SimilarityCandidate<T>],
    ranked: Vec<(usize, f64, f64)>,
) -> Vec<Neighbor<'_, T>> {
    ranked
        .into_iter()
        .map(|(index, distance, similarity)| Neighbor {
            index,
            item: &candidates[index].item,
            distance,
            similarity,
        })
        .collect()
}

/// Returns the `k` candidates closest to `target`, nearest first.
///
/// Returns fewer than `k` when there are fewer candidates. Candidates at
/// equal distance keep their input order.
#[must_use]
pub fn find_knn<'a, T>(
    target: &FeatureVector,
    candidates: &'a [SimilarityCandidate<T>],
    k: usize,
    metric: DistanceMetric,
) -> Vec<Neighbor<'a, T>> {
    let ranked = rank(
        target,
        candidates.iter().map(|c| &c.features).enumerate(),
        k,
        metric,
    );
    tracing::debug!(candidates = candidates.len(), k, ?metric, "ranked candidates");
    to_neighbors(candidates, ranked)
}

/// Euclidean KNN after scaling weighted features on both sides.
///
/// Each weight multiplies the target's and the candidate's value before the
/// difference is squared, so a weight `w` scales that feature's squared term
/// by `w²`.
#[must_use]
pub fn find_weighted_knn<'a, T>(
    target: &FeatureVector,
    candidates: &'a [SimilarityCandidate<T>],
    k: usize,
    weights: &BTreeMap<String, f64>,
) -> Vec<Neighbor<'a, T>> {
    let weighted_target = apply_weights(target, weights);
    let weighted: Vec<FeatureVector> = candidates
        .iter()
        .map(|c| apply_weights(&c.features, weights))
        .collect();

    let ranked = rank(
        &weighted_target,
        weighted.iter().enumerate(),
        k,
        DistanceMetric::Euclidean,
    );
    tracing::debug!(
        candidates = candidates.len(),
        k,
        weighted_features = weights.len(),
        "ranked weighted candidates"
    );
    to_neighbors(candidates, ranked)
}

/// Human-readable reasons why `candidate` resembles `target`.
///
/// For every feature present in both vectors whose values differ by at most
/// `tolerance`, emits `"Similar <name>: <target> vs <candidate>"`. `names`
/// maps feature keys to display names; unmapped keys display as-is.
#[must_use]
pub fn explain_similarity_within(
    target: &FeatureVector,
    candidate: &FeatureVector,
    names: &BTreeMap<String, String>,
    tolerance: f64,
) -> Vec<String> {
    target
        .iter()
        .filter_map(|(key, t)| {
            let c = candidate.value(key)?;
            if (t - c).abs() <= tolerance {
                let name = names.get(key).map_or(key, String::as_str);
                Some(format!("Similar {name}: {t:.2} vs {c:.2}"))
            } else {
                None
            }
        })
        .collect()
}

/// [`explain_similarity_within`] at the default tolerance of 0.1.
#[must_use]
pub fn explain_similarity(
    target: &FeatureVector,
    candidate: &FeatureVector,
    names: &BTreeMap<String, String>,
) -> Vec<String> {
    explain_similarity_within(target, candidate, names, DEFAULT_EXPLAIN_TOLERANCE)
}

/// KNN ranker with a configured `k`, metric, and explanation tolerance.
///
/// Unlike the free functions, [`SimilarityEngine::rank`] and
/// [`SimilarityEngine::rank_weighted`] normalize the target and candidates
/// together before ranking, so every comparison shares one min/max basis.
///
/// # Example
///
/// ```
/// use clinical_decision::neighbors::{SimilarityCandidate, SimilarityEngine};
/// use clinical_decision::primitives::FeatureVector;
///
/// let engine = SimilarityEngine::new(1);
/// let target = FeatureVector::new().with("age", 40.0);
/// let candidates = vec![
///     SimilarityCandidate::new(1, FeatureVector::new().with("age", 80.0)),
///     SimilarityCandidate::new(2, FeatureVector::new().with("age", 42.0)),
/// ];
/// let ranked = engine.rank(&target, &candidates);
/// assert_eq!(*ranked[0].item, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityEngine {
    /// Number of neighbors returned
    k: usize,
    /// Distance metric
    metric: DistanceMetric,
    /// Tolerance for explanations
    explain_tolerance: f64,
}

impl SimilarityEngine {
    /// Creates an engine returning `k` neighbors by Euclidean distance.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            metric: DistanceMetric::Euclidean,
            explain_tolerance: DEFAULT_EXPLAIN_TOLERANCE,
        }
    }

    /// Sets the distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Sets the explanation tolerance.
    #[must_use]
    pub fn with_explain_tolerance(mut self, tolerance: f64) -> Self {
        self.explain_tolerance = tolerance;
        self
    }

    /// Number of neighbors returned.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Configured metric.
    #[must_use]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Configured explanation tolerance.
    #[must_use]
    pub fn explain_tolerance(&self) -> f64 {
        self.explain_tolerance
    }

    /// Normalizes `{target} ∪ candidates` together, then ranks.
    #[must_use]
    pub fn rank<'a, T>(
        &self,
        target: &FeatureVector,
        candidates: &'a [SimilarityCandidate<T>],
    ) -> Vec<Neighbor<'a, T>> {
        let (norm_target, norm_candidates) = Self::normalize_batch(target, candidates);
        let ranked = rank(
            &norm_target,
            norm_candidates.iter().enumerate(),
            self.k,
            self.metric,
        );
        to_neighbors(candidates, ranked)
    }

    /// Normalizes `{target} ∪ candidates` together, applies `weights`, then
    /// ranks by weighted Euclidean distance.
    #[must_use]
    pub fn rank_weighted<'a, T>(
        &self,
        target: &FeatureVector,
        candidates: &'a [SimilarityCandidate<T>],
        weights: &BTreeMap<String, f64>,
    ) -> Vec<Neighbor<'a, T>> {
        let (norm_target, norm_candidates) = Self::normalize_batch(target, candidates);
        let weighted_target = apply_weights(&norm_target, weights);
        let weighted: Vec<FeatureVector> = norm_candidates
            .iter()
            .map(|c| apply_weights(c, weights))
            .collect();
        let ranked = rank(
            &weighted_target,
            weighted.iter().enumerate(),
            self.k,
            DistanceMetric::Euclidean,
        );
        to_neighbors(candidates, ranked)
    }

    /// Explains similarity at the configured tolerance.
    #[must_use]
    pub fn explain(
        &self,
        target: &FeatureVector,
        candidate: &FeatureVector,
        names: &BTreeMap<String, String>,
    ) -> Vec<String> {
        explain_similarity_within(target, candidate, names, self.explain_tolerance)
    }

    fn normalize_batch<T>(
        target: &FeatureVector,
        candidates: &[SimilarityCandidate<T>],
    ) -> (FeatureVector, Vec<FeatureVector>) {
        let batch: Vec<FeatureVector> = std::iter::once(target.clone())
            .chain(candidates.iter().map(|c| c.features.clone()))
            .collect();
        let mut normalized = normalize_features(&batch).into_iter();
        let norm_target = normalized.next().unwrap_or_default();
        (norm_target, normalized.collect())
    }
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests;
