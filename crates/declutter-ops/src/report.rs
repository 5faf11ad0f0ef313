//! Execution reports.

use serde::{Deserialize, Serialize};

use crate::operation::Operation;

/// What happened to one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationStatus {
    /// The change was applied to the filesystem.
    Applied,
    /// Dry run: the operation was checked but not applied.
    SkippedDryRun,
    /// The operation could not be applied.
    Failed { reason: String },
}

impl OperationStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// One operation paired with its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub operation: Operation,
    pub status: OperationStatus,
}

/// Outcome of executing a plan.
///
/// Contains exactly one outcome per planned operation, in plan order, so
/// callers can always account for every operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Per-operation outcomes, in plan order.
    pub outcomes: Vec<OperationOutcome>,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl ExecutionReport {
    /// Number of operations applied.
    pub fn applied_count(&self) -> usize {
        self.count(|s| matches!(s, OperationStatus::Applied))
    }

    /// Number of operations skipped because of dry run.
    pub fn skipped_count(&self) -> usize {
        self.count(|s| matches!(s, OperationStatus::SkippedDryRun))
    }

    /// Number of operations that failed.
    pub fn failed_count(&self) -> usize {
        self.count(|s| s.is_failed())
    }

    /// Check if every operation succeeded (or was skipped dry).
    pub fn is_clean(&self) -> bool {
        self.failed_count() == 0
    }

    /// Iterate over the failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &OperationOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failed())
    }

    fn count(&self, pred: impl Fn(&OperationStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let op = Operation::Delete {
            target: "/data/x".into(),
        };
        let report = ExecutionReport {
            outcomes: vec![
                OperationOutcome {
                    operation: op.clone(),
                    status: OperationStatus::Applied,
                },
                OperationOutcome {
                    operation: op.clone(),
                    status: OperationStatus::Failed {
                        reason: "gone".into(),
                    },
                },
                OperationOutcome {
                    operation: op,
                    status: OperationStatus::Applied,
                },
            ],
            dry_run: false,
        };

        assert_eq!(report.applied_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.skipped_count(), 0);
        assert!(!report.is_clean());
        assert_eq!(report.failures().count(), 1);
    }
}
