//! Explainable rule trees.
//!
//! A [`RuleTree`] is a hand-authored binary tree of clinical threshold
//! comparisons stored as an arena of [`TreeNode`]s addressed by index.
//! Traversal takes the left child when a comparison holds and the right
//! child when it does not, and records every rule it passes so the
//! recommendation can be audited.
//!
//! Trees are validated once, when constructed. A tree that passes
//! validation always terminates in at most [`RuleTree::depth`] steps.
//!
//! # Example
//!
//! ```
//! use clinical_decision::primitives::FeatureVector;
//! use clinical_decision::tree::discharge_readiness_tree;
//!
//! let tree = discharge_readiness_tree().expect("shipped tree is valid");
//! let patient = FeatureVector::new()
//!     .with("oxygenSaturation", 85.0)
//!     .with("temperature", 37.0);
//!
//! let result = tree.predict(&patient);
//! assert_eq!(result.recommendation, "NOT_READY");
//! assert_eq!(result.rule_path.len(), 2);
//! ```

pub mod next_steps;
mod shipped;

use crate::error::{Result, TreeError};
use crate::primitives::FeatureVector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub use next_steps::{guidance, guidance_or_generic, Guidance, GENERIC_GUIDANCE};
pub use shipped::{care_path_tree, discharge_readiness_tree, load_tree};

/// Comparison applied at a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// `value > threshold`
    Gt,
    /// `value < threshold`
    Lt,
    /// `value >= threshold`
    Gte,
    /// `value <= threshold`
    Lte,
    /// `value == threshold`
    Eq,
}

impl Operator {
    /// Evaluates `value <op> threshold`.
    #[must_use]
    pub fn evaluate(self, value: f64, threshold: f64) -> bool {
        match self {
            Operator::Gt => value > threshold,
            Operator::Lt => value < threshold,
            Operator::Gte => value >= threshold,
            Operator::Lte => value <= threshold,
            #[allow(clippy::float_cmp)]
            Operator::Eq => value == threshold,
        }
    }

    /// Mathematical symbol for display.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Eq => "==",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Internal node: a threshold comparison with two children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitNode {
    /// Feature read from the input vector
    pub feature: String,
    /// Comparison operator
    pub operator: Operator,
    /// Threshold compared against
    pub threshold: f64,
    /// Human-readable rule recorded in the path
    pub rule: String,
    /// Arena index taken when the comparison holds
    pub left: usize,
    /// Arena index taken when the comparison fails
    pub right: usize,
}

/// Terminal node carrying a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafNode {
    /// Recommendation code
    pub prediction: String,
    /// Static confidence in [0, 1]
    pub confidence: f64,
    /// Human-readable rule recorded in the path
    pub rule: String,
}

/// A node in a rule tree arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal comparison node
    Split(SplitNode),
    /// Terminal recommendation node
    Leaf(LeafNode),
}

/// Serializable, independent copy of a tree's structure.
///
/// Used both to author trees as data and to export a live tree for display
/// or audit. Mutating a snapshot never affects the tree it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// Tree name
    pub name: String,
    /// Arena index of the root
    #[serde(default)]
    pub root: usize,
    /// Node arena
    pub nodes: Vec<TreeNode>,
}

impl TreeSnapshot {
    /// Serializes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a snapshot from YAML (JSON is accepted as well).
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// One split visited during traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionStep {
    /// Arena index of the split
    pub node: usize,
    /// Feature compared
    pub feature: String,
    /// Comparison operator
    pub operator: Operator,
    /// Threshold compared against
    pub threshold: f64,
    /// Value read from the input (missing reads as 0)
    pub value: f64,
    /// Whether the comparison held (left branch)
    pub went_left: bool,
}

/// Outcome of a rule-tree traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResult {
    /// Prediction of the reached leaf
    pub recommendation: String,
    /// Static confidence authored on the reached leaf
    pub confidence: f64,
    /// Rules passed, root first, ending with the leaf's rule
    pub rule_path: Vec<String>,
    /// Rule path joined with `" → "`, then the recommendation text
    pub reasoning: String,
    /// Ordered follow-up actions for the recommendation
    pub next_steps: Vec<String>,
    /// Arena index of the reached leaf
    pub leaf: usize,
    /// Every split visited, with the observed value and branch taken
    pub trace: Vec<DecisionStep>,
}

impl DecisionResult {
    /// Number of splits traversed.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.trace.len()
    }

    /// Multi-line, node-by-node explanation of the traversal.
    #[must_use]
    pub fn explain(&self) -> String {
        let depth = self.depth();
        let mut explanation = format!("Decision Path (depth={depth}):\n");

        for step in &self.trace {
            let answer = if step.went_left { "YES" } else { "NO" };
            explanation.push_str(&format!(
                "  Node {}: {} {} {}? value={} {answer}\n",
                step.node, step.feature, step.operator, step.threshold, step.value
            ));
        }

        explanation.push_str(&format!(
            "  LEAF {} -> {} (confidence={:.2})\n",
            self.leaf, self.recommendation, self.confidence
        ));
        explanation
    }
}

/// A validated, immutable rule tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTree {
    name: String,
    root: usize,
    nodes: Vec<TreeNode>,
    depth: usize,
}

impl RuleTree {
    /// Builds a tree from an arena, validating it.
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] if the arena is empty, the root or any child
    /// index is out of bounds, a node is reachable more than once or not at
    /// all, a leaf has an empty prediction or a confidence outside [0, 1], or
    /// a split has an empty feature or a non-finite threshold.
    pub fn new(
        name: impl Into<String>,
        nodes: Vec<TreeNode>,
        root: usize,
    ) -> std::result::Result<Self, TreeError> {
        let name = name.into();
        let depth = validate(&name, &nodes, root)?;
        tracing::info!(tree = %name, nodes = nodes.len(), depth, "rule tree validated");
        Ok(Self {
            name,
            root,
            nodes,
            depth,
        })
    }

    /// Builds a tree from a snapshot, validating it.
    ///
    /// # Errors
    ///
    /// See [`RuleTree::new`].
    pub fn from_snapshot(snapshot: TreeSnapshot) -> std::result::Result<Self, TreeError> {
        Self::new(snapshot.name, snapshot.nodes, snapshot.root)
    }

    /// Tree name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arena index of the root.
    #[must_use]
    pub fn root(&self) -> usize {
        self.root
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a validated tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Longest root-to-leaf path, counted in splits.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Node at `index`, if any.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    /// Distinct features consulted anywhere in the tree.
    #[must_use]
    pub fn features(&self) -> BTreeSet<&str> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                TreeNode::Split(split) => Some(split.feature.as_str()),
                TreeNode::Leaf(_) => None,
            })
            .collect()
    }

    /// Traverses the tree for `features`.
    ///
    /// Missing features read as 0. The left child is taken when a comparison
    /// holds, the right child otherwise.
    #[must_use]
    pub fn predict(&self, features: &FeatureVector) -> DecisionResult {
        let mut rule_path = Vec::with_capacity(self.depth + 1);
        let mut trace = Vec::with_capacity(self.depth);
        let mut index = self.root;

        // Validation guarantees every index is in bounds and every path ends in a leaf
        loop {
            match &self.nodes[index] {
                TreeNode::Split(split) => {
                    let value = features.get(&split.feature);
                    let went_left = split.operator.evaluate(value, split.threshold);
                    rule_path.push(split.rule.clone());
                    trace.push(DecisionStep {
                        node: index,
                        feature: split.feature.clone(),
                        operator: split.operator,
                        threshold: split.threshold,
                        value,
                        went_left,
                    });
                    index = if went_left { split.left } else { split.right };
                }
                TreeNode::Leaf(leaf) => {
                    rule_path.push(leaf.rule.clone());
                    let guidance = guidance_or_generic(&leaf.prediction);
                    let reasoning = format!(
                        "{}. Recommendation: {}",
                        rule_path.join(" → "),
                        guidance.description
                    );
                    tracing::debug!(
                        tree = %self.name,
                        leaf = index,
                        recommendation = %leaf.prediction,
                        depth = trace.len(),
                        "rule tree decision"
                    );
                    return DecisionResult {
                        recommendation: leaf.prediction.clone(),
                        confidence: leaf.confidence,
                        rule_path,
                        reasoning,
                        next_steps: guidance.steps.iter().map(ToString::to_string).collect(),
                        leaf: index,
                        trace,
                    };
                }
            }
        }
    }

    /// Deep copy of the tree structure for display or audit.
    #[must_use]
    pub fn export_tree(&self) -> TreeSnapshot {
        TreeSnapshot {
            name: self.name.clone(),
            root: self.root,
            nodes: self.nodes.clone(),
        }
    }
}

impl TryFrom<TreeSnapshot> for RuleTree {
    type Error = TreeError;

    fn try_from(snapshot: TreeSnapshot) -> std::result::Result<Self, Self::Error> {
        Self::from_snapshot(snapshot)
    }
}

/// Checks arena structure; returns the depth in splits.
fn validate(name: &str, nodes: &[TreeNode], root: usize) -> std::result::Result<usize, TreeError> {
    let tree = || name.to_string();
    let len = nodes.len();

    if len == 0 {
        return Err(TreeError::Empty { tree: tree() });
    }
    if root >= len {
        return Err(TreeError::RootOutOfBounds {
            tree: tree(),
            root,
            len,
        });
    }

    let mut visited = vec![false; len];
    let mut max_depth = 0;
    let mut stack = vec![(root, 0usize)];
    visited[root] = true;

    while let Some((index, depth)) = stack.pop() {
        match &nodes[index] {
            TreeNode::Split(split) => {
                if split.feature.is_empty() {
                    return Err(TreeError::EmptyFeature {
                        tree: tree(),
                        node: index,
                    });
                }
                if !split.threshold.is_finite() {
                    return Err(TreeError::NonFiniteThreshold {
                        tree: tree(),
                        node: index,
                        threshold: split.threshold,
                    });
                }
                for (side, child) in [("left", split.left), ("right", split.right)] {
                    if child >= len {
                        return Err(TreeError::DanglingChild {
                            tree: tree(),
                            node: index,
                            side,
                            child,
                            len,
                        });
                    }
                    if visited[child] {
                        return Err(TreeError::SharedNode {
                            tree: tree(),
                            node: child,
                        });
                    }
                    visited[child] = true;
                    stack.push((child, depth + 1));
                }
            }
            TreeNode::Leaf(leaf) => {
                if leaf.prediction.is_empty() {
                    return Err(TreeError::EmptyPrediction {
                        tree: tree(),
                        node: index,
                    });
                }
                if !(0.0..=1.0).contains(&leaf.confidence) {
                    return Err(TreeError::InvalidConfidence {
                        tree: tree(),
                        node: index,
                        confidence: leaf.confidence,
                    });
                }
                max_depth = max_depth.max(depth);
            }
        }
    }

    if let Some(orphan) = visited.iter().position(|seen| !seen) {
        return Err(TreeError::Unreachable {
            tree: tree(),
            node: orphan,
        });
    }

    Ok(max_depth)
}
