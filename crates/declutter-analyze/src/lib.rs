//! Analysis engines for declutter.
//!
//! Everything here is read-only: analyses consume a [`Snapshot`] and
//! produce reports; turning a report into filesystem changes is the job of
//! `declutter-ops`.
//!
//! - Duplicate detection: size-bucket pruning followed by streaming
//!   BLAKE3 fingerprints. Only files that share a size with another
//!   candidate are ever hashed.
//! - Disk usage: per-category totals and the largest files.
//! - Cleanup finders: empty directories, temp-file patterns, and
//!   files older than a cutoff.
//!
//! # Duplicate detection
//!
//! ```rust,ignore
//! use declutter_analyze::{DuplicateConfig, DuplicateFinder};
//! use declutter_scan::{DirScanner, ScanConfig};
//!
//! let snapshot = DirScanner::new().scan(&ScanConfig::new("/path")).unwrap();
//! let report = DuplicateFinder::new().find_duplicates(&snapshot);
//!
//! println!("{} duplicate groups", report.group_count());
//! println!("{} bytes reclaimable", report.total_wasted_bytes);
//! ```

mod cleanup;
mod duplicates;
mod hashing;
mod usage;

pub use cleanup::{CleanupConfig, CleanupConfigBuilder, CleanupFinder, CleanupReport};
pub use duplicates::{
    DuplicateConfig, DuplicateConfigBuilder, DuplicateFinder, DuplicateGroup, DuplicateReport,
};
pub use hashing::{fingerprint_file, HASH_CHUNK_SIZE};
pub use usage::{CategoryUsage, UsageAnalyzer, UsageReport};

// Re-export core types
pub use declutter_core::{Category, FileRecord, Fingerprint, Snapshot};
