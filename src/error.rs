//! Error types for engine construction.
//!
//! Inference on well-typed input never fails; only building models, loading
//! configuration, and validating rule trees can return an error.

use thiserror::Error;

/// Main error type for engine operations.
///
/// # Examples
///
/// ```
/// use clinical_decision::error::EngineError;
///
/// let err = EngineError::InvalidConfig {
///     param: "similarity.default_k".to_string(),
///     value: "0".to_string(),
///     constraint: ">= 1".to_string(),
/// };
/// assert!(err.to_string().contains("default_k"));
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Strict prediction requested on a classifier with no trained labels.
    #[error("classifier has no trained labels")]
    NoTrainedLabels,

    /// A rule tree failed startup validation.
    #[error("invalid rule tree: {0}")]
    InvalidTree(#[from] TreeError),

    /// Configuration value outside its allowed range.
    #[error("invalid configuration: {param} = {value}, expected {constraint}")]
    InvalidConfig {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Generic error with string message.
    #[error("{0}")]
    Other(String),
}

/// Structural defects found while validating a rule tree arena.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    /// The arena holds no nodes.
    #[error("tree '{tree}' has no nodes")]
    Empty {
        /// Tree name
        tree: String,
    },

    /// The root index does not address a node.
    #[error("tree '{tree}': root index {root} out of bounds (len={len})")]
    RootOutOfBounds {
        /// Tree name
        tree: String,
        /// Root index
        root: usize,
        /// Arena length
        len: usize,
    },

    /// A split node points at a missing child.
    #[error("tree '{tree}': node {node} has {side} child {child} out of bounds (len={len})")]
    DanglingChild {
        /// Tree name
        tree: String,
        /// Offending split node
        node: usize,
        /// "left" or "right"
        side: &'static str,
        /// Child index
        child: usize,
        /// Arena length
        len: usize,
    },

    /// A node is reachable along more than one edge (shared child or cycle).
    #[error("tree '{tree}': node {node} reached more than once")]
    SharedNode {
        /// Tree name
        tree: String,
        /// Node index
        node: usize,
    },

    /// A node cannot be reached from the root.
    #[error("tree '{tree}': node {node} unreachable from root")]
    Unreachable {
        /// Tree name
        tree: String,
        /// Node index
        node: usize,
    },

    /// A leaf carries an empty prediction.
    #[error("tree '{tree}': leaf {node} has an empty prediction")]
    EmptyPrediction {
        /// Tree name
        tree: String,
        /// Node index
        node: usize,
    },

    /// A leaf confidence lies outside [0, 1].
    #[error("tree '{tree}': leaf {node} confidence {confidence} outside [0, 1]")]
    InvalidConfidence {
        /// Tree name
        tree: String,
        /// Node index
        node: usize,
        /// Offending confidence
        confidence: f64,
    },

    /// A split names no feature.
    #[error("tree '{tree}': split {node} has an empty feature name")]
    EmptyFeature {
        /// Tree name
        tree: String,
        /// Node index
        node: usize,
    },

    /// A split threshold is NaN or infinite.
    #[error("tree '{tree}': split {node} threshold {threshold} is not finite")]
    NonFiniteThreshold {
        /// Tree name
        tree: String,
        /// Node index
        node: usize,
        /// Offending threshold
        threshold: f64,
    },
}

impl From<&str> for EngineError {
    fn from(msg: &str) -> Self {
        EngineError::Other(msg.to_string())
    }
}

impl From<String> for EngineError {
    fn from(msg: String) -> Self {
        EngineError::Other(msg)
    }
}

impl From<serde_yaml::Error> for EngineError {
    fn from(err: serde_yaml::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

impl EngineError {
    /// Create an invalid configuration error with descriptive context
    #[must_use]
    pub fn invalid_config(param: &str, value: impl ToString, constraint: &str) -> Self {
        Self::InvalidConfig {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_trained_labels_display() {
        let err = EngineError::NoTrainedLabels;
        assert_eq!(err.to_string(), "classifier has no trained labels");
    }

    #[test]
    fn test_invalid_config_helper() {
        let err = EngineError::invalid_config("similarity.default_k", 0, ">= 1");
        let msg = err.to_string();
        assert!(msg.contains("similarity.default_k"));
        assert!(msg.contains("= 0"));
        assert!(msg.contains(">= 1"));
    }

    #[test]
    fn test_tree_error_wraps() {
        let err: EngineError = TreeError::Empty {
            tree: "care_path".to_string(),
        }
        .into();
        assert!(matches!(err, EngineError::InvalidTree(_)));
        assert!(err.to_string().contains("care_path"));
    }

    #[test]
    fn test_dangling_child_display() {
        let err = TreeError::DanglingChild {
            tree: "t".to_string(),
            node: 3,
            side: "left",
            child: 9,
            len: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("node 3"));
        assert!(msg.contains("left child 9"));
        assert!(msg.contains("len=5"));
    }

    #[test]
    fn test_from_str() {
        let err: EngineError = "test error".into();
        assert!(matches!(err, EngineError::Other(_)));
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_from_string() {
        let err: EngineError = "test error".to_string().into();
        assert!(matches!(err, EngineError::Other(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: EngineError = io_err.into();
        assert!(matches!(err, EngineError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<Vec<u32>>("{not: a list}").unwrap_err();
        let err: EngineError = yaml_err.into();
        assert!(matches!(err, EngineError::Serialization(_)));
    }

    #[test]
    fn test_error_source_io() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = EngineError::Io(io_err);
        assert!(err.source().is_some());
    }
}
