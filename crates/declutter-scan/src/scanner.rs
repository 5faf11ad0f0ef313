//! jwalk-based directory scanner.

use std::time::{Instant, UNIX_EPOCH};

use jwalk::{Parallelism, WalkDir};
use tracing::debug;

use declutter_core::{
    CategoryTable, FileRecord, ScanConfig, ScanError, ScanStats, ScanWarning, Snapshot,
    WarningKind,
};

/// Directory scanner producing [`Snapshot`]s.
///
/// Traversal is serial and sorted so discovery order is deterministic for
/// an unchanged tree; callers rely on that order for duplicate-group
/// membership and keep-policy tie-breaking.
pub struct DirScanner {
    categories: CategoryTable,
}

impl DirScanner {
    /// Create a scanner with the default category table.
    pub fn new() -> Self {
        Self {
            categories: CategoryTable::default(),
        }
    }

    /// Create a scanner with a custom category table.
    pub fn with_categories(categories: CategoryTable) -> Self {
        Self { categories }
    }

    /// Walk the configured root once and collect a snapshot.
    ///
    /// Per-entry errors become warnings on the snapshot; only a missing or
    /// non-directory root is a hard error.
    pub fn scan(&self, config: &ScanConfig) -> Result<Snapshot, ScanError> {
        let start = Instant::now();
        let requested = config.effective_root();
        let root = requested
            .canonicalize()
            .map_err(|e| ScanError::io(&requested, e))?;

        if !root.is_dir() {
            return Err(ScanError::NotADirectory { path: root });
        }

        let mut stats = ScanStats::new();
        let mut warnings = Vec::new();
        let mut records = Vec::new();

        let mut walker = WalkDir::new(&root)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(!config.include_hidden)
            .follow_links(false)
            .max_depth(config.max_depth.map(|d| d as usize).unwrap_or(usize::MAX));

        if !config.ignore_patterns.is_empty() {
            let filter = config.clone();
            walker = walker.process_read_dir(move |_, _, _, children| {
                children.retain(|entry| match entry {
                    Ok(e) => !filter.should_ignore(&e.file_name().to_string_lossy()),
                    Err(_) => true,
                });
            });
        }

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    warnings.push(ScanWarning::new(path, err.to_string(), WarningKind::ReadError));
                    continue;
                }
            };

            let depth = entry.depth() as u32;
            let file_type = entry.file_type();

            if file_type.is_symlink() {
                // Never followed: avoids link cycles and escaping the root.
                stats.record_symlink();
                continue;
            }

            if file_type.is_dir() {
                stats.record_dir(depth);
                continue;
            }

            if !file_type.is_file() {
                continue;
            }

            let path = entry.path();
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(err) => {
                    warnings.push(ScanWarning::new(
                        &path,
                        err.to_string(),
                        WarningKind::MetadataError,
                    ));
                    continue;
                }
            };

            let size = metadata.len();
            if size < config.min_size {
                stats.record_skipped_small();
                continue;
            }

            stats.record_file(size, depth);
            records.push(FileRecord::new(
                &path,
                size,
                metadata.modified().unwrap_or(UNIX_EPOCH),
                self.categories.category_of(&path),
            ));
        }

        let scan_duration = start.elapsed();
        debug!(
            files = stats.total_files,
            dirs = stats.total_dirs,
            bytes = stats.total_size,
            ?scan_duration,
            "scan complete"
        );

        Ok(Snapshot::new(
            root,
            records,
            config.clone(),
            stats,
            scan_duration,
            warnings,
        ))
    }
}

impl Default for DirScanner {
    fn default() -> Self {
        Self::new()
    }
}
