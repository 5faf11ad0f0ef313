//! Disk usage breakdown by category and largest files.

use serde::{Deserialize, Serialize};

use declutter_core::{Category, FileRecord, Snapshot};

use indexmap::IndexMap;

/// Usage total for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUsage {
    pub category: Category,
    pub bytes: u64,
    pub file_count: u64,
}

/// Disk usage report for one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageReport {
    /// Total size of all files in bytes.
    pub total_bytes: u64,

    /// Per-category totals, ordered by bytes descending (ties by category
    /// name).
    pub by_category: Vec<CategoryUsage>,

    /// Up to `top_n` largest files, size descending (ties by path).
    pub largest_files: Vec<FileRecord>,
}

/// Disk usage analyzer.
#[derive(Debug, Clone)]
pub struct UsageAnalyzer {
    top_n: usize,
}

impl UsageAnalyzer {
    /// Create an analyzer reporting the `top_n` largest files.
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Aggregate a snapshot into a usage report. Read-only; single pass
    /// over the records.
    pub fn analyze(&self, snapshot: &Snapshot) -> UsageReport {
        let mut total_bytes = 0u64;
        let mut by_category: IndexMap<Category, CategoryUsage> = IndexMap::new();

        for record in &snapshot.records {
            total_bytes += record.size;
            let entry = by_category
                .entry(record.category)
                .or_insert_with(|| CategoryUsage {
                    category: record.category,
                    bytes: 0,
                    file_count: 0,
                });
            entry.bytes += record.size;
            entry.file_count += 1;
        }

        let mut by_category: Vec<CategoryUsage> = by_category.into_values().collect();
        by_category.sort_by(|a, b| {
            b.bytes
                .cmp(&a.bytes)
                .then_with(|| a.category.cmp(&b.category))
        });

        let mut largest_files: Vec<FileRecord> = snapshot.records.clone();
        largest_files.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        largest_files.truncate(self.top_n);

        UsageReport {
            total_bytes,
            by_category,
            largest_files,
        }
    }
}

impl Default for UsageAnalyzer {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declutter_core::{ScanConfig, ScanStats};
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn record(path: &str, size: u64, category: Category) -> FileRecord {
        FileRecord::new(path, size, SystemTime::now(), category)
    }

    fn snapshot(records: Vec<FileRecord>) -> Snapshot {
        Snapshot::new(
            PathBuf::from("/test"),
            records,
            ScanConfig::new("/test"),
            ScanStats::new(),
            Duration::ZERO,
            Vec::new(),
        )
    }

    #[test]
    fn test_totals_and_category_order() {
        let snap = snapshot(vec![
            record("/test/a.pdf", 100, Category::Documents),
            record("/test/b.pdf", 50, Category::Documents),
            record("/test/c.jpg", 400, Category::Images),
        ]);

        let report = UsageAnalyzer::new(10).analyze(&snap);

        assert_eq!(report.total_bytes, 550);
        assert_eq!(report.by_category.len(), 2);
        assert_eq!(report.by_category[0].category, Category::Images);
        assert_eq!(report.by_category[0].bytes, 400);
        assert_eq!(report.by_category[1].bytes, 150);
        assert_eq!(report.by_category[1].file_count, 2);
    }

    #[test]
    fn test_largest_files_top_n_and_ties() {
        let snap = snapshot(vec![
            record("/test/b.bin", 10, Category::Other),
            record("/test/a.bin", 10, Category::Other),
            record("/test/c.bin", 99, Category::Other),
            record("/test/d.bin", 1, Category::Other),
        ]);

        let report = UsageAnalyzer::new(3).analyze(&snap);

        assert_eq!(report.largest_files.len(), 3);
        assert_eq!(report.largest_files[0].path, PathBuf::from("/test/c.bin"));
        // Equal sizes break ties by path lexical order
        assert_eq!(report.largest_files[1].path, PathBuf::from("/test/a.bin"));
        assert_eq!(report.largest_files[2].path, PathBuf::from("/test/b.bin"));
    }

    #[test]
    fn test_empty_snapshot() {
        let report = UsageAnalyzer::default().analyze(&snapshot(Vec::new()));
        assert_eq!(report.total_bytes, 0);
        assert!(report.by_category.is_empty());
        assert!(report.largest_files.is_empty());
    }
}
