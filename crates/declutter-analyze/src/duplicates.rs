//! Duplicate file detection using content fingerprints.
//!
//! Two-phase algorithm:
//! 1. Bucket candidate files by size (cheap, no I/O).
//! 2. Fingerprint only the files that share a size with at least one other
//!    candidate, then bucket by fingerprint.
//!
//! A file with a globally unique size is never hashed. Group membership
//! keeps traversal discovery order, so keep-policy tie-breaking downstream
//! is deterministic.

use std::path::PathBuf;

use derive_builder::Builder;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use declutter_core::{FileRecord, Fingerprint, ScanWarning, Snapshot};

use crate::hashing::fingerprint_file;

/// Configuration for duplicate detection.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct DuplicateConfig {
    /// Minimum file size to consider (skip tiny files).
    #[builder(default = "1024")]
    pub min_size: u64,

    /// Maximum file size to consider (skip huge files).
    #[builder(default = "u64::MAX")]
    pub max_size: u64,

    /// Maximum number of groups to return (0 = unlimited).
    #[builder(default = "0")]
    pub max_groups: usize,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            min_size: 1024,
            max_size: u64::MAX,
            max_groups: 0,
        }
    }
}

impl DuplicateConfig {
    /// Create a new config builder.
    pub fn builder() -> DuplicateConfigBuilder {
        DuplicateConfigBuilder::default()
    }
}

/// A group of files sharing the same content.
///
/// Always has at least two members, all of exactly equal size, in
/// traversal discovery order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Fingerprint shared by all files in this group.
    pub fingerprint: Fingerprint,

    /// Size of each file in bytes.
    pub size: u64,

    /// Member files, in discovery order.
    pub records: Vec<FileRecord>,

    /// Wasted space: size * (count - 1).
    pub wasted_bytes: u64,
}

impl DuplicateGroup {
    /// Number of files in this group.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// How many files could be deleted while keeping one copy.
    pub fn deletable_count(&self) -> usize {
        self.records.len().saturating_sub(1)
    }

    /// Iterate over member paths.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.records.iter().map(|r| &r.path)
    }
}

/// Results from duplicate analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Root that was scanned; plans built from this report stay inside it.
    pub root: PathBuf,

    /// Duplicate groups, ordered by wasted space descending.
    pub groups: Vec<DuplicateGroup>,

    /// Candidate files within the size window.
    pub files_considered: u64,

    /// Files actually passed to the hashing engine.
    pub files_hashed: u64,

    /// Total reclaimable space across all groups.
    pub total_wasted_bytes: u64,

    /// Files excluded because they could not be hashed.
    pub warnings: Vec<ScanWarning>,
}

impl DuplicateReport {
    /// Check if any duplicates were found.
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Number of duplicate groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of duplicate files across all groups.
    pub fn total_duplicate_files(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }
}

/// Duplicate file finder.
pub struct DuplicateFinder {
    config: DuplicateConfig,
}

impl DuplicateFinder {
    /// Create a finder with default config.
    pub fn new() -> Self {
        Self {
            config: DuplicateConfig::default(),
        }
    }

    /// Create a finder with custom config.
    pub fn with_config(config: DuplicateConfig) -> Self {
        Self { config }
    }

    /// Find duplicate files in a snapshot.
    ///
    /// Hash failures are logged, surfaced on the report's warning list,
    /// and excluded; one unreadable file never aborts the analysis.
    pub fn find_duplicates(&self, snapshot: &Snapshot) -> DuplicateReport {
        let candidates: Vec<&FileRecord> = snapshot
            .records
            .iter()
            .filter(|r| r.size >= self.config.min_size && r.size <= self.config.max_size)
            .collect();
        let files_considered = candidates.len() as u64;

        // Phase 1: size buckets, insertion-ordered so discovery order
        // survives into the groups.
        let mut by_size: IndexMap<u64, Vec<&FileRecord>> = IndexMap::new();
        for record in candidates {
            by_size.entry(record.size).or_default().push(record);
        }
        by_size.retain(|_, files| files.len() > 1);

        let to_hash: Vec<&FileRecord> = by_size.into_values().flatten().collect();
        let files_hashed = to_hash.len() as u64;

        // Phase 2: fingerprint size-matched files. Hashing is parallel;
        // collect preserves input order so bucketing stays deterministic.
        let hashed: Vec<(&FileRecord, Result<Fingerprint, _>)> = to_hash
            .par_iter()
            .map(|record| (*record, fingerprint_file(&record.path)))
            .collect();

        let mut warnings = Vec::new();
        let mut by_fingerprint: IndexMap<Fingerprint, Vec<FileRecord>> = IndexMap::new();
        for (record, result) in hashed {
            match result {
                Ok(fingerprint) => {
                    by_fingerprint
                        .entry(fingerprint)
                        .or_default()
                        .push(record.clone());
                }
                Err(err) => {
                    warn!(path = %record.path.display(), %err, "excluding unreadable file");
                    warnings.push(ScanWarning::read_error(&record.path, &err));
                }
            }
        }

        let mut groups: Vec<DuplicateGroup> = by_fingerprint
            .into_iter()
            .filter(|(_, records)| records.len() >= 2)
            .map(|(fingerprint, records)| {
                let size = records[0].size;
                let wasted_bytes = size * (records.len() as u64 - 1);
                DuplicateGroup {
                    fingerprint,
                    size,
                    records,
                    wasted_bytes,
                }
            })
            .collect();

        groups.sort_by(|a, b| {
            b.wasted_bytes
                .cmp(&a.wasted_bytes)
                .then_with(|| a.records[0].path.cmp(&b.records[0].path))
        });

        if self.config.max_groups > 0 && groups.len() > self.config.max_groups {
            groups.truncate(self.config.max_groups);
        }

        let total_wasted_bytes = groups.iter().map(|g| g.wasted_bytes).sum();

        DuplicateReport {
            root: snapshot.root.clone(),
            groups,
            files_considered,
            files_hashed,
            total_wasted_bytes,
            warnings,
        }
    }
}

impl Default for DuplicateFinder {
    fn default() -> Self {
        Self::new()
    }
}
