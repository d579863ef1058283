//! Trees authored as YAML arenas and compiled into the binary.

use super::{RuleTree, TreeSnapshot};
use crate::error::Result;
use std::fs;
use std::path::Path;

const CARE_PATH_YAML: &str = include_str!("data/care_path.yaml");
const DISCHARGE_READINESS_YAML: &str = include_str!("data/discharge_readiness.yaml");

/// Care-path tree: routes an admitted patient to a care pathway from vitals,
/// surgery history, age, mobility, pain, and length of stay.
///
/// # Errors
///
/// Returns an error if the embedded tree fails to parse or validate.
pub fn care_path_tree() -> Result<RuleTree> {
    parse_tree(CARE_PATH_YAML)
}

/// Discharge-readiness tree: decides whether and how a patient can leave.
///
/// # Errors
///
/// Returns an error if the embedded tree fails to parse or validate.
pub fn discharge_readiness_tree() -> Result<RuleTree> {
    parse_tree(DISCHARGE_READINESS_YAML)
}

/// Loads and validates a tree from a YAML or JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub fn load_tree<P: AsRef<Path>>(path: P) -> Result<RuleTree> {
    let raw = fs::read_to_string(path.as_ref())?;
    tracing::debug!(path = %path.as_ref().display(), "loading rule tree");
    parse_tree(&raw)
}

fn parse_tree(yaml: &str) -> Result<RuleTree> {
    let snapshot = TreeSnapshot::from_yaml_str(yaml)?;
    Ok(RuleTree::from_snapshot(snapshot)?)
}
