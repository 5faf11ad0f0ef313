//! Plan execution.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::operation::{Operation, OperationPlan};
use crate::report::{ExecutionReport, OperationOutcome, OperationStatus};

/// Options controlling how a plan is executed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ExecuteOptions {
    /// Apply changes to the filesystem. Off by default: a plain `apply`
    /// is always a dry run.
    pub commit: bool,

    /// Send deleted files to the system trash instead of removing them.
    pub use_trash: bool,
}

/// Executes operation plans.
///
/// Execution is per-operation and never aborts: a failed operation is
/// recorded and the rest of the plan still runs. The report always has
/// exactly one outcome per planned operation.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    options: ExecuteOptions,
}

impl Executor {
    /// Create an executor that performs dry runs only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an executor with explicit options.
    pub fn with_options(options: ExecuteOptions) -> Self {
        Self { options }
    }

    /// Execute a plan.
    ///
    /// Scope is re-checked per operation even on dry runs, so a
    /// hand-edited plan that escapes its root shows up as failures
    /// before anyone commits it.
    pub fn apply(&self, plan: &OperationPlan) -> ExecutionReport {
        let dry_run = !self.options.commit;
        info!(
            root = %plan.root.display(),
            operations = plan.len(),
            dry_run,
            "executing plan"
        );

        let outcomes = plan
            .operations
            .iter()
            .map(|op| OperationOutcome {
                operation: op.clone(),
                status: self.apply_one(&plan.root, op, dry_run),
            })
            .collect();

        ExecutionReport { outcomes, dry_run }
    }

    fn apply_one(&self, root: &Path, op: &Operation, dry_run: bool) -> OperationStatus {
        if let Some(path) = escaping_path(root, op) {
            warn!(path = %path.display(), root = %root.display(), "operation escapes root");
            return OperationStatus::Failed {
                reason: format!("path escapes plan root: {}", path.display()),
            };
        }

        if dry_run {
            debug!(%op, "dry run");
            return OperationStatus::SkippedDryRun;
        }

        let result = match op {
            Operation::Move {
                source,
                destination,
            } => move_file(source, destination),
            Operation::Delete { target } => delete_path(target, self.options.use_trash),
        };

        match result {
            Ok(()) => {
                debug!(%op, "applied");
                OperationStatus::Applied
            }
            Err(reason) => {
                warn!(%op, %reason, "operation failed");
                OperationStatus::Failed { reason }
            }
        }
    }
}

fn escaping_path<'a>(root: &Path, op: &'a Operation) -> Option<&'a Path> {
    match op {
        Operation::Move {
            source,
            destination,
        } => [source.as_path(), destination.as_path()]
            .into_iter()
            .find(|p| !p.starts_with(root)),
        Operation::Delete { target } => (!target.starts_with(root)).then(|| target.as_path()),
    }
}

/// Move one file. Refuses to overwrite: an occupied destination fails the
/// operation. Rename first, copy + remove when crossing filesystems.
fn move_file(source: &Path, destination: &Path) -> Result<(), String> {
    if destination.exists() {
        return Err(format!(
            "destination already exists: {}",
            destination.display()
        ));
    }
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
    }

    if fs::rename(source, destination).is_ok() {
        return Ok(());
    }

    fs::copy(source, destination).map_err(|e| format!("failed to copy: {e}"))?;
    fs::remove_file(source).map_err(|e| format!("failed to remove source: {e}"))
}

/// Delete a file or an empty directory. Directory deletion is
/// non-recursive, so a directory that gained content since planning fails
/// instead of taking its contents with it.
fn delete_path(target: &Path, use_trash: bool) -> Result<(), String> {
    if use_trash {
        return trash::delete(target).map_err(|e| format!("failed to trash: {e}"));
    }
    let metadata =
        fs::symlink_metadata(target).map_err(|e| format!("failed to stat: {e}"))?;
    if metadata.is_dir() {
        fs::remove_dir(target).map_err(|e| format!("failed to remove directory: {e}"))
    } else {
        fs::remove_file(target).map_err(|e| format!("failed to remove file: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationPlan;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn commit() -> Executor {
        Executor::with_options(ExecuteOptions {
            commit: true,
            use_trash: false,
        })
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.txt"), "hello").unwrap();

        let plan = OperationPlan::new(
            root,
            vec![Operation::Delete {
                target: root.join("a.txt"),
            }],
        );
        let report = Executor::new().apply(&plan);

        assert!(report.dry_run);
        assert_eq!(report.skipped_count(), 1);
        assert!(root.join("a.txt").exists());
    }

    #[test]
    fn test_commit_moves_file() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.txt"), "hello").unwrap();

        let plan = OperationPlan::new(
            root,
            vec![Operation::Move {
                source: root.join("a.txt"),
                destination: root.join("docs/a.txt"),
            }],
        );
        let report = commit().apply(&plan);

        assert_eq!(report.applied_count(), 1);
        assert!(!root.join("a.txt").exists());
        assert_eq!(fs::read_to_string(root.join("docs/a.txt")).unwrap(), "hello");
    }

    #[test]
    fn test_move_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.txt"), "new").unwrap();
        fs::create_dir(root.join("docs")).unwrap();
        fs::write(root.join("docs/a.txt"), "old").unwrap();

        let plan = OperationPlan::new(
            root,
            vec![Operation::Move {
                source: root.join("a.txt"),
                destination: root.join("docs/a.txt"),
            }],
        );
        let report = commit().apply(&plan);

        assert_eq!(report.failed_count(), 1);
        assert_eq!(fs::read_to_string(root.join("docs/a.txt")).unwrap(), "old");
        assert!(root.join("a.txt").exists());
    }

    #[test]
    fn test_delete_directory_is_non_recursive() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("dir")).unwrap();
        fs::write(root.join("dir/surprise.txt"), "x").unwrap();

        let plan = OperationPlan::new(
            root,
            vec![Operation::Delete {
                target: root.join("dir"),
            }],
        );
        let report = commit().apply(&plan);

        assert_eq!(report.failed_count(), 1);
        assert!(root.join("dir/surprise.txt").exists());
    }

    #[test]
    fn test_out_of_scope_fails_even_on_dry_run() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        let plan = OperationPlan::new(
            root,
            vec![Operation::Delete {
                target: PathBuf::from("/somewhere/else.txt"),
            }],
        );

        let dry = Executor::new().apply(&plan);
        assert_eq!(dry.failed_count(), 1);

        let wet = commit().apply(&plan);
        assert_eq!(wet.failed_count(), 1);
    }

    #[test]
    fn test_failure_does_not_stop_the_plan() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("c.txt"), "c").unwrap();

        let plan = OperationPlan::new(
            root,
            vec![
                Operation::Delete {
                    target: root.join("a.txt"),
                },
                Operation::Delete {
                    target: root.join("missing.txt"),
                },
                Operation::Delete {
                    target: root.join("c.txt"),
                },
            ],
        );
        let report = commit().apply(&plan);

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.applied_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert!(!root.join("c.txt").exists());
    }
}
