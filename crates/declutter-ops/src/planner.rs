//! Plan builders: dedupe, organize by type, organize by date, delete lists.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::warn;

use declutter_analyze::DuplicateReport;
use declutter_core::{CategoryTable, FileRecord, Snapshot};

use crate::operation::{Operation, OperationPlan, PlanError};

/// Default directory layout for date organization: `2024/03/`.
pub const DEFAULT_DATE_FORMAT: &str = "%Y/%m";

/// Which copy of a duplicate group survives deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepPolicy {
    /// Keep the first file found during traversal.
    #[default]
    FirstDiscovered,
    /// Keep the last file found during traversal.
    LastDiscovered,
    /// Keep the file with the shortest path.
    ShortestPath,
    /// Keep the file with the longest path.
    LongestPath,
}

impl KeepPolicy {
    /// Index of the record to keep. Path-length ties resolve to the
    /// earlier discovery, so the same group always keeps the same file.
    fn keep_index(&self, records: &[FileRecord]) -> usize {
        let path_len = |r: &FileRecord| r.path.as_os_str().len();
        match self {
            Self::FirstDiscovered => 0,
            Self::LastDiscovered => records.len() - 1,
            Self::ShortestPath => {
                let mut best = 0;
                for (i, r) in records.iter().enumerate().skip(1) {
                    if path_len(r) < path_len(&records[best]) {
                        best = i;
                    }
                }
                best
            }
            Self::LongestPath => {
                let mut best = 0;
                for (i, r) in records.iter().enumerate().skip(1) {
                    if path_len(r) > path_len(&records[best]) {
                        best = i;
                    }
                }
                best
            }
        }
    }
}

/// Builds operation plans from analysis results.
///
/// Planning is pure: it reads reports and snapshots but never the live
/// filesystem state of the records, and it never mutates anything. The
/// same inputs always produce the same plan.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    categories: CategoryTable,
}

impl Planner {
    /// Create a planner with the default category table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a planner with a custom category table.
    pub fn with_categories(categories: CategoryTable) -> Self {
        Self { categories }
    }

    /// Plan the deletion of redundant copies in every duplicate group.
    ///
    /// One file per group is kept according to `policy`; deletes are
    /// emitted in discovery order.
    pub fn dedupe(&self, report: &DuplicateReport, policy: KeepPolicy) -> OperationPlan {
        let mut operations = Vec::new();
        for group in &report.groups {
            let keep = policy.keep_index(&group.records);
            for (i, record) in group.records.iter().enumerate() {
                if i != keep {
                    operations.push(Operation::Delete {
                        target: record.path.clone(),
                    });
                }
            }
        }
        OperationPlan::new(report.root.clone(), operations)
    }

    /// Plan moving every file into a per-category folder under `dest_root`.
    pub fn organize_by_type(&self, snapshot: &Snapshot, dest_root: &Path) -> OperationPlan {
        self.organize(snapshot, dest_root, |record| {
            PathBuf::from(self.categories.category_of(&record.path).folder_name())
        })
    }

    /// Plan moving every file into a date-derived folder under `dest_root`.
    ///
    /// `date_format` is a strftime pattern applied to the file's modified
    /// time; path separators in the pattern create nested folders. The
    /// pattern is checked up front so a bad one fails the whole plan
    /// instead of individual operations.
    pub fn organize_by_date(
        &self,
        snapshot: &Snapshot,
        dest_root: &Path,
        date_format: &str,
    ) -> Result<OperationPlan, PlanError> {
        if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
            return Err(PlanError::InvalidDateFormat {
                format: date_format.to_string(),
            });
        }
        Ok(self.organize(snapshot, dest_root, |record| {
            let modified: DateTime<Local> = record.modified.into();
            PathBuf::from(modified.format(date_format).to_string())
        }))
    }

    /// Plan the deletion of an explicit list of paths, e.g. the temp files
    /// and empty directories from a cleanup report.
    pub fn delete_targets(
        &self,
        root: impl Into<PathBuf>,
        targets: impl IntoIterator<Item = PathBuf>,
    ) -> OperationPlan {
        let operations = targets
            .into_iter()
            .map(|target| Operation::Delete { target })
            .collect();
        OperationPlan::new(root, operations)
    }

    fn organize(
        &self,
        snapshot: &Snapshot,
        dest_root: &Path,
        subdir_for: impl Fn(&FileRecord) -> PathBuf,
    ) -> OperationPlan {
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut operations = Vec::new();

        for record in &snapshot.records {
            // Files already sorted under the destination stay put.
            if record.path.starts_with(dest_root) {
                continue;
            }
            let dir = dest_root.join(subdir_for(record));
            let wanted = dir.join(record.name.as_str());
            if wanted == record.path {
                continue;
            }
            match claim_destination(wanted, &mut claimed) {
                Some(destination) => operations.push(Operation::Move {
                    source: record.path.clone(),
                    destination,
                }),
                None => {
                    warn!(
                        path = %record.path.display(),
                        "no free destination name, leaving file in place"
                    );
                }
            }
        }

        OperationPlan::new(snapshot.root.clone(), operations)
    }
}

/// Pick a destination not yet taken on disk or by an earlier operation in
/// the same plan. For "file.txt", tries "file (1).txt", "file (2).txt", up
/// to a bounded number of attempts.
fn claim_destination(wanted: PathBuf, claimed: &mut HashSet<PathBuf>) -> Option<PathBuf> {
    let free = |p: &Path, claimed: &HashSet<PathBuf>| !p.exists() && !claimed.contains(p);

    if free(&wanted, claimed) {
        claimed.insert(wanted.clone());
        return Some(wanted);
    }

    let parent = wanted.parent().unwrap_or(Path::new(""));
    let stem = wanted.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let extension = wanted.extension().and_then(|e| e.to_str());

    for i in 1..1000 {
        let name = match extension {
            Some(ext) => format!("{stem} ({i}).{ext}"),
            None => format!("{stem} ({i})"),
        };
        let candidate = parent.join(name);
        if free(&candidate, claimed) {
            claimed.insert(candidate.clone());
            return Some(candidate);
        }
    }

    None
}
