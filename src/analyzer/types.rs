// Data types for Analyzer module

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a construct must or must not appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintType {
    Required,
    Forbidden,
}

impl std::fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintType::Required => f.write_str("Required"),
            ConstraintType::Forbidden => f.write_str("Forbidden"),
        }
    }
}

/// Occurrence thresholds; `0` or absent means unset.
///
/// `max_depth` bounds the occurrence count, not nesting depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintSpecifics {
    #[serde(default)]
    pub min_depth: Option<u32>,
    #[serde(default)]
    pub max_depth: Option<u32>,
}

/// Caller-supplied structural rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralConstraint {
    #[serde(rename = "type")]
    pub kind: ConstraintType,
    /// Free-form label, normalized per language before counting
    pub construct: String,
    #[serde(default)]
    pub specifics: Option<ConstraintSpecifics>,
}

impl StructuralConstraint {
    pub fn required(construct: impl Into<String>) -> Self {
        Self {
            kind: ConstraintType::Required,
            construct: construct.into(),
            specifics: None,
        }
    }

    pub fn forbidden(construct: impl Into<String>) -> Self {
        Self {
            kind: ConstraintType::Forbidden,
            construct: construct.into(),
            specifics: None,
        }
    }

    pub fn with_bounds(mut self, min_depth: u32, max_depth: u32) -> Self {
        self.specifics = Some(ConstraintSpecifics {
            min_depth: Some(min_depth),
            max_depth: Some(max_depth),
        });
        self
    }

    /// Minimum count: `minDepth` when set, else 1 for Required and 0 for Forbidden
    pub fn min_required(&self) -> usize {
        match self.specifics.and_then(|s| s.min_depth).filter(|d| *d > 0) {
            Some(min) => min as usize,
            None if self.kind == ConstraintType::Required => 1,
            None => 0,
        }
    }

    /// Maximum count, `None` when unbounded
    pub fn max_allowed(&self) -> Option<usize> {
        self.specifics
            .and_then(|s| s.max_depth)
            .filter(|d| *d > 0)
            .map(|d| d as usize)
    }
}

/// Outcome of one constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintResult {
    /// The label as the caller wrote it
    pub constraint: String,
    #[serde(rename = "type")]
    pub kind: ConstraintType,
    pub count: usize,
    pub passed: bool,
    pub message: String,
}

/// Construct occurrence counts for one source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Structure {
    counts: BTreeMap<&'static str, usize>,
}

impl Structure {
    pub fn set(&mut self, key: &'static str, count: usize) {
        self.counts.insert(key, count);
    }

    /// Count for a construct key; unknown keys count 0
    pub fn count(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }
}
