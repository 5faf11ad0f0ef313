//! Directory traversal engine for declutter.
//!
//! This crate walks a directory tree once and produces a [`Snapshot`]:
//! a flat list of file records in deterministic traversal order, plus
//! statistics and non-fatal warnings.
//!
//! Symbolic links are never followed; this keeps the walk inside the
//! requested root and immune to link cycles.
//!
//! # Example
//!
//! ```rust,no_run
//! use declutter_scan::{DirScanner, ScanConfig};
//!
//! let config = ScanConfig::new("/path/to/scan");
//! let snapshot = DirScanner::new().scan(&config).unwrap();
//!
//! println!("{} files, {} bytes", snapshot.file_count(), snapshot.total_size());
//! ```

mod scanner;

pub use scanner::DirScanner;

// Re-export core types for convenience
pub use declutter_core::{
    Category, CategoryTable, FileRecord, ScanConfig, ScanError, ScanStats, ScanWarning, Snapshot,
    WarningKind,
};
