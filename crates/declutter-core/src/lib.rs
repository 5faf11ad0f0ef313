//! Core types for declutter.
//!
//! This crate provides the fundamental data structures shared by the
//! scanning, analysis, and operation crates: file records, content
//! fingerprints, the category table, and scan configuration.

mod category;
mod config;
mod error;
mod record;

pub use category::{Category, CategoryTable};
pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use record::{FileRecord, Fingerprint, ScanStats, Snapshot};
