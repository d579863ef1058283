//! Named, sparse numeric feature vectors.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

/// A raw feature value as supplied by a caller.
///
/// Resolved to a number once, at the boundary: `true` is `1.0`, `false` is
/// `0.0`, and a missing value (`null` in JSON/YAML) is `0.0`.
///
/// # Examples
///
/// ```
/// use clinical_decision::primitives::FeatureValue;
///
/// assert_eq!(FeatureValue::from(true).as_f64(), 1.0);
/// assert_eq!(FeatureValue::from(37.5).as_f64(), 37.5);
/// assert_eq!(FeatureValue::Missing.as_f64(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Numeric value
    Number(f64),
    /// Boolean flag, coerced to 1/0
    Boolean(bool),
    /// Absent value, coerced to 0
    Missing,
}

impl FeatureValue {
    /// Resolves the value to a number.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            FeatureValue::Number(v) => v,
            FeatureValue::Boolean(true) => 1.0,
            FeatureValue::Boolean(false) | FeatureValue::Missing => 0.0,
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Number(v)
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Boolean(v)
    }
}

impl<T: Into<FeatureValue>> From<Option<T>> for FeatureValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FeatureValue::Missing, Into::into)
    }
}

/// Caller-supplied features before boolean/missing coercion.
pub type RawFeatures = BTreeMap<String, FeatureValue>;

/// Mapping of feature name to numeric value.
///
/// Keys iterate in sorted order, so every computation over a vector is
/// reproducible. Two vectors need not share keys; a missing key reads as `0.0`.
///
/// # Examples
///
/// ```
/// use clinical_decision::primitives::FeatureVector;
///
/// let v = FeatureVector::new().with("age", 42.0).with("heartRate", 80.0);
/// assert_eq!(v.get("age"), 42.0);
/// assert_eq!(v.get("temperature"), 0.0);
/// assert_eq!(v.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    /// Creates an empty feature vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves raw caller features into numbers.
    #[must_use]
    pub fn from_raw(raw: &RawFeatures) -> Self {
        raw.iter()
            .map(|(name, value)| (name.clone(), value.as_f64()))
            .collect()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts or replaces a feature value.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    /// Returns the value for `name`, or `0.0` if absent.
    #[must_use]
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    /// Returns the value for `name` only if it is present.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Mutable access to a present value.
    pub fn value_mut(&mut self, name: &str) -> Option<&mut f64> {
        self.values.get_mut(name)
    }

    /// Returns true if `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Feature names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of present features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no feature is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Union of the keys present in either vector, sorted.
    #[must_use]
    pub fn union_keys<'a>(&'a self, other: &'a FeatureVector) -> BTreeSet<&'a str> {
        self.keys().chain(other.keys()).collect()
    }

    /// Euclidean norm over present values.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.values.values().map(|v| v * v).sum::<f64>().sqrt()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<BTreeMap<String, f64>> for FeatureVector {
    fn from(values: BTreeMap<String, f64>) -> Self {
        Self { values }
    }
}

impl From<&RawFeatures> for FeatureVector {
    fn from(raw: &RawFeatures) -> Self {
        Self::from_raw(raw)
    }
}

impl IntoIterator for FeatureVector {
    type Item = (String, f64);
    type IntoIter = btree_map::IntoIter<String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
