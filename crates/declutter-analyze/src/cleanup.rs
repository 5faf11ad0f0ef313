//! Cleanup finders: empty directories, temp files, old files.
//!
//! All finders are read-only. Their output feeds the delete planner in
//! `declutter-ops`; nothing here touches the filesystem beyond reading.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use derive_builder::Builder;
use globset::{Glob, GlobSet, GlobSetBuilder};
use jwalk::{Parallelism, WalkDir};
use serde::{Deserialize, Serialize};
use tracing::warn;

use declutter_core::{FileRecord, ScanError, Snapshot};

/// Name patterns treated as temporary files by default.
const DEFAULT_TEMP_PATTERNS: &[&str] = &[
    "~*",
    "*.tmp",
    "*.temp",
    "*.cache",
    "*.bak",
    "*.old",
    "*.swp",
    "*.swo",
    "Desktop.ini",
    "Thumbs.db",
    ".DS_Store",
];

/// Configuration for cleanup analysis.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct CleanupConfig {
    /// Glob patterns (matched against file names) for temp files.
    #[builder(default = "CleanupConfig::default_temp_patterns()")]
    pub temp_patterns: Vec<String>,

    /// Files not modified within this window count as old.
    #[builder(default)]
    pub max_age: Option<Duration>,
}

impl CleanupConfig {
    /// Create a new config builder.
    pub fn builder() -> CleanupConfigBuilder {
        CleanupConfigBuilder::default()
    }

    fn default_temp_patterns() -> Vec<String> {
        DEFAULT_TEMP_PATTERNS.iter().map(|p| p.to_string()).collect()
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            temp_patterns: Self::default_temp_patterns(),
            max_age: None,
        }
    }
}

/// Findings from one cleanup analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupReport {
    /// Empty directories, deepest first.
    pub empty_dirs: Vec<PathBuf>,

    /// Files matching a temp pattern.
    pub temp_files: Vec<FileRecord>,

    /// Files older than the configured cutoff (empty when no cutoff set).
    pub old_files: Vec<FileRecord>,

    /// Bytes freed by deleting all temp and old files.
    pub reclaimable_bytes: u64,
}

/// Cleanup finder.
pub struct CleanupFinder {
    config: CleanupConfig,
    temp_matcher: GlobSet,
}

impl CleanupFinder {
    /// Create a finder with the default config.
    pub fn new() -> Result<Self, ScanError> {
        Self::with_config(CleanupConfig::default())
    }

    /// Create a finder with custom config. Fails if a temp pattern is not
    /// a valid glob.
    pub fn with_config(config: CleanupConfig) -> Result<Self, ScanError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.temp_patterns {
            let glob = Glob::new(pattern).map_err(|e| ScanError::InvalidConfig {
                message: format!("bad temp pattern {pattern:?}: {e}"),
            })?;
            builder.add(glob);
        }
        let temp_matcher = builder.build().map_err(|e| ScanError::InvalidConfig {
            message: e.to_string(),
        })?;
        Ok(Self {
            config,
            temp_matcher,
        })
    }

    /// Find directories containing no entries, deepest first.
    ///
    /// Deepest-first ordering lets a delete plan remove nested empties in
    /// one pass without re-scanning.
    pub fn find_empty_dirs(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
        let root = root.canonicalize().map_err(|e| ScanError::io(root, e))?;
        if !root.is_dir() {
            return Err(ScanError::NotADirectory { path: root });
        }

        let walker = WalkDir::new(&root)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(false)
            .follow_links(false);

        let mut empty = Vec::new();
        for entry in walker.into_iter().flatten() {
            if !entry.file_type().is_dir() || entry.depth() == 0 {
                continue;
            }
            let path = entry.path();
            match std::fs::read_dir(&path) {
                Ok(mut entries) => {
                    if entries.next().is_none() {
                        empty.push(path);
                    }
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping unreadable directory");
                }
            }
        }

        empty.sort_by(|a, b| {
            b.components()
                .count()
                .cmp(&a.components().count())
                .then_with(|| a.cmp(b))
        });
        Ok(empty)
    }

    /// Files in the snapshot whose name matches a temp pattern.
    pub fn find_temp_files(&self, snapshot: &Snapshot) -> Vec<FileRecord> {
        snapshot
            .records
            .iter()
            .filter(|r| self.temp_matcher.is_match(r.name.as_str()))
            .cloned()
            .collect()
    }

    /// Files in the snapshot not modified within `max_age`.
    pub fn find_old_files(&self, snapshot: &Snapshot, max_age: Duration) -> Vec<FileRecord> {
        let cutoff = SystemTime::now()
            .checked_sub(max_age)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        snapshot
            .records
            .iter()
            .filter(|r| r.modified < cutoff)
            .cloned()
            .collect()
    }

    /// Run all finders over one snapshot.
    pub fn report(&self, snapshot: &Snapshot) -> Result<CleanupReport, ScanError> {
        let empty_dirs = self.find_empty_dirs(&snapshot.root)?;
        let temp_files = self.find_temp_files(snapshot);
        let old_files = match self.config.max_age {
            Some(max_age) => self.find_old_files(snapshot, max_age),
            None => Vec::new(),
        };

        let reclaimable_bytes = temp_files
            .iter()
            .chain(old_files.iter())
            .map(|r| r.size)
            .sum();

        Ok(CleanupReport {
            empty_dirs,
            temp_files,
            old_files,
            reclaimable_bytes,
        })
    }
}
