//! Core feature primitives.
//!
//! Every algorithm in the crate consumes [`FeatureVector`]s: sparse maps from
//! feature name to `f64`. Absent keys read as `0.0`. Raw caller input that may
//! hold booleans or nulls arrives as [`RawFeatures`] and is resolved exactly
//! once through [`FeatureVector::from_raw`].

mod feature;

pub use feature::{FeatureValue, FeatureVector, RawFeatures};
