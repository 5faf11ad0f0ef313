//! File records, content fingerprints, and scan snapshots.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::config::ScanConfig;
use crate::error::ScanWarning;

/// BLAKE3 content fingerprint used to detect byte-identical files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    /// Create a new fingerprint from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the fingerprint as a hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// A regular file discovered during a scan.
///
/// Records are created fresh on every scan and owned by the snapshot that
/// produced them; nothing is persisted across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute path to the file.
    pub path: PathBuf,

    /// File name component.
    pub name: CompactString,

    /// Size in bytes.
    pub size: u64,

    /// Last modification time.
    pub modified: SystemTime,

    /// Category derived from the file extension.
    pub category: Category,
}

impl FileRecord {
    /// Create a new file record.
    pub fn new(
        path: impl Into<PathBuf>,
        size: u64,
        modified: SystemTime,
        category: Category,
    ) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy()))
            .unwrap_or_default();
        Self {
            path,
            name,
            size,
            modified,
            category,
        }
    }
}

/// Summary statistics for a scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Total size of all recorded files in bytes.
    pub total_size: u64,
    /// Number of files recorded.
    pub total_files: u64,
    /// Number of directories visited.
    pub total_dirs: u64,
    /// Number of symbolic links seen (never followed).
    pub total_symlinks: u64,
    /// Number of files skipped by the minimum-size floor.
    pub skipped_small: u64,
    /// Maximum depth reached.
    pub max_depth: u32,
}

impl ScanStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file entry.
    pub fn record_file(&mut self, size: u64, depth: u32) {
        self.total_files += 1;
        self.total_size += size;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a directory.
    pub fn record_dir(&mut self, depth: u32) {
        self.total_dirs += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a symlink.
    pub fn record_symlink(&mut self) {
        self.total_symlinks += 1;
    }

    /// Record a file excluded by the size floor.
    pub fn record_skipped_small(&mut self) {
        self.skipped_small += 1;
    }
}

/// A read-only snapshot of one directory scan.
///
/// Records are in traversal discovery order, which is deterministic for an
/// unchanged tree. The snapshot lives only for the duration of one
/// analysis; there is no cross-call cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Canonicalized root that was scanned.
    pub root: PathBuf,

    /// Files discovered, in traversal order.
    pub records: Vec<FileRecord>,

    /// When this scan was performed.
    pub scanned_at: SystemTime,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Scan configuration used.
    pub config: ScanConfig,

    /// Summary statistics.
    pub stats: ScanStats,

    /// Warnings encountered during the scan.
    pub warnings: Vec<ScanWarning>,
}

impl Snapshot {
    /// Create a new snapshot.
    pub fn new(
        root: PathBuf,
        records: Vec<FileRecord>,
        config: ScanConfig,
        stats: ScanStats,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        Self {
            root,
            records,
            scanned_at: SystemTime::now(),
            scan_duration,
            config,
            stats,
            warnings,
        }
    }

    /// Total size of recorded files in bytes.
    pub fn total_size(&self) -> u64 {
        self.stats.total_size
    }

    /// Number of recorded files.
    pub fn file_count(&self) -> usize {
        self.records.len()
    }

    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Iterate over records under a sub-path of the root.
    pub fn records_under<'a>(&'a self, dir: &'a Path) -> impl Iterator<Item = &'a FileRecord> {
        self.records.iter().filter(move |r| r.path.starts_with(dir))
    }
}
