//! Clinical decision support: explainable inference primitives for a
//! hospital care-coordination platform.
//!
//! The crate bundles three independent, synchronous engines:
//!
//! - a multinomial Naive Bayes text classifier that triages alerts and
//!   labels medical records,
//! - a K-nearest-neighbor ranker that matches patients, volunteers and
//!   doctors on numeric features, with optional per-feature weights,
//! - hand-authored rule trees that route patients to care pathways and
//!   judge discharge readiness, recording every rule they pass.
//!
//! Models are built once at startup and then only read, so inference is
//! lock-free and safe to share across threads.
//!
//! # Quick Start
//!
//! ```
//! use clinical_decision::prelude::*;
//!
//! let engine = ClinicalEngine::with_defaults().unwrap();
//!
//! let alert = engine.classify_alert_priority(Some("Code blue"), Some("emergency cardiac arrest"));
//! assert_eq!(alert.label, "Critical");
//!
//! let patient = FeatureVector::new()
//!     .with("oxygenSaturation", 85.0)
//!     .with("temperature", 37.0);
//! let decision = engine.discharge_readiness(&patient);
//! assert_eq!(decision.recommendation, "NOT_READY");
//! println!("{}", decision.reasoning);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Named, sparse feature vectors
//! - [`text`]: Tokenization
//! - [`classification`]: Naive Bayes text classifier and seed corpora
//! - [`preprocessing`]: Min-max normalization over feature batches
//! - [`neighbors`]: KNN and weighted KNN ranking, similarity explanations
//! - [`tree`]: Explainable rule trees and the shipped clinical trees
//! - [`extract`]: Adapters from domain documents to feature vectors
//! - [`config`]: YAML engine configuration
//! - [`engine`]: The assembled, startup-validated engine

pub mod classification;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod neighbors;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod text;
pub mod traits;
pub mod tree;

pub use engine::ClinicalEngine;
pub use error::{EngineError, Result};
pub use primitives::FeatureVector;
pub use traits::Transformer;
