//! Operations and plans.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or validating a plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// An operation references a path outside the plan root.
    #[error("path escapes plan root {root}: {path}")]
    OutOfScope { path: PathBuf, root: PathBuf },

    /// The strftime pattern for date organization does not parse.
    #[error("invalid date format: {format:?}")]
    InvalidDateFormat { format: String },
}

/// A single planned filesystem change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    /// Move a file from `source` to `destination`.
    Move {
        source: PathBuf,
        destination: PathBuf,
    },
    /// Delete a file or an empty directory.
    Delete { target: PathBuf },
}

impl Operation {
    /// The path this operation reads from.
    pub fn source(&self) -> &Path {
        match self {
            Self::Move { source, .. } => source,
            Self::Delete { target } => target,
        }
    }

    /// Every path this operation touches.
    fn paths(&self) -> impl Iterator<Item = &Path> {
        let (first, second) = match self {
            Self::Move {
                source,
                destination,
            } => (source.as_path(), Some(destination.as_path())),
            Self::Delete { target } => (target.as_path(), None),
        };
        std::iter::once(first).chain(second)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Move {
                source,
                destination,
            } => write!(f, "move {} -> {}", source.display(), destination.display()),
            Self::Delete { target } => write!(f, "delete {}", target.display()),
        }
    }
}

/// An ordered list of operations, all scoped to one root directory.
///
/// Plans are inert data: building one never touches the filesystem, and a
/// plan can be serialized, inspected, and executed later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationPlan {
    /// Directory every operation must stay inside.
    pub root: PathBuf,

    /// Operations in execution order.
    pub operations: Vec<Operation>,
}

impl OperationPlan {
    /// Create a plan scoped to `root`.
    pub fn new(root: impl Into<PathBuf>, operations: Vec<Operation>) -> Self {
        Self {
            root: root.into(),
            operations,
        }
    }

    /// Create an empty plan.
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Vec::new())
    }

    /// Number of operations in the plan.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the plan has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Verify that every operation stays inside the plan root.
    pub fn validate(&self) -> Result<(), PlanError> {
        for op in &self.operations {
            for path in op.paths() {
                if !path.starts_with(&self.root) {
                    return Err(PlanError::OutOfScope {
                        path: path.to_path_buf(),
                        root: self.root.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
