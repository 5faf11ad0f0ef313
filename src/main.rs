//! declutter - duplicate detection and safe bulk file reorganization.
//!
//! Usage:
//!   declutter usage [PATH]        Disk usage breakdown by category
//!   declutter duplicates [PATH]   Find duplicate files
//!   declutter dedupe [PATH]       Plan (and optionally apply) duplicate removal
//!   declutter organize [PATH]     Plan (and optionally apply) file organization
//!   declutter cleanup [PATH]      Find empty dirs, temp files, old files
//!   declutter report [PATH]       Full JSON report of all analyses
//!
//! Every mutating command is a dry run unless `--commit` is given.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use declutter_analyze::{
    CleanupConfig, CleanupFinder, CleanupReport, DuplicateConfig, DuplicateFinder,
    DuplicateReport, UsageAnalyzer, UsageReport,
};
use declutter_core::Snapshot;
use declutter_ops::{
    ExecuteOptions, ExecutionReport, Executor, KeepPolicy, OperationPlan, OperationStatus,
    Planner, DEFAULT_DATE_FORMAT,
};
use declutter_scan::{DirScanner, ScanConfig};

#[derive(Parser)]
#[command(
    name = "declutter",
    version,
    about = "Duplicate detection and safe bulk file reorganization",
    long_about = "declutter finds duplicate files and wasted disk space, and builds\n\
                  reviewable plans for deduplicating and reorganizing directories.\n\n\
                  Plans are dry runs by default; pass --commit to apply them."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Disk usage breakdown by category
    Usage {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Number of largest files to show
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Find duplicate files
    Duplicates {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Minimum file size to consider (e.g., "1KB", "1MB")
        #[arg(short, long, default_value = "1KB")]
        min_size: String,

        /// Maximum number of duplicate groups to show (0 = all)
        #[arg(short = 'n', long, default_value = "20")]
        top: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Remove redundant copies of duplicate files
    Dedupe {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Minimum file size to consider (e.g., "1KB", "1MB")
        #[arg(short, long, default_value = "1KB")]
        min_size: String,

        /// Which copy of each group to keep
        #[arg(short, long, default_value = "first")]
        keep: KeepArg,

        /// Apply the plan instead of printing it
        #[arg(long)]
        commit: bool,

        /// Send deleted files to the system trash
        #[arg(long)]
        trash: bool,
    },

    /// Move files into category or date folders
    Organize {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Organize by file category or by modification date
        #[arg(short, long, default_value = "type")]
        by: OrganizeMode,

        /// Destination directory (relative paths resolve under PATH)
        #[arg(short, long, default_value = "sorted")]
        dest: PathBuf,

        /// strftime pattern for date folders
        #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
        date_format: String,

        /// Apply the plan instead of printing it
        #[arg(long)]
        commit: bool,
    },

    /// Find empty directories, temp files, and old files
    Cleanup {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Also flag files not modified within this window (e.g., "30d", "6m")
        #[arg(long)]
        older_than: Option<String>,

        /// Delete the findings (temp files and empty dirs) instead of listing
        #[arg(long)]
        commit: bool,

        /// Send deleted files to the system trash
        #[arg(long)]
        trash: bool,
    },

    /// Full JSON report of all analyses
    Report {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Minimum file size for duplicate detection
        #[arg(short, long, default_value = "1KB")]
        min_size: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum KeepArg {
    /// First file found during traversal
    #[default]
    First,
    /// Last file found during traversal
    Last,
    /// File with the shortest path
    ShortestPath,
    /// File with the longest path
    LongestPath,
}

impl From<KeepArg> for KeepPolicy {
    fn from(arg: KeepArg) -> Self {
        match arg {
            KeepArg::First => KeepPolicy::FirstDiscovered,
            KeepArg::Last => KeepPolicy::LastDiscovered,
            KeepArg::ShortestPath => KeepPolicy::ShortestPath,
            KeepArg::LongestPath => KeepPolicy::LongestPath,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrganizeMode {
    /// Per-category folders (documents/, images/, ...)
    Type,
    /// Date-derived folders from the modification time
    Date,
}

/// Everything the `report` subcommand emits.
#[derive(Serialize)]
struct FullReport {
    generated_at: String,
    root: PathBuf,
    usage: UsageReport,
    duplicates: DuplicateReport,
    cleanup: CleanupReport,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Usage { path, top, format } => run_usage(&path, top, format),
        Command::Duplicates {
            path,
            min_size,
            top,
            format,
        } => run_duplicates(&path, &min_size, top, format),
        Command::Dedupe {
            path,
            min_size,
            keep,
            commit,
            trash,
        } => run_dedupe(&path, &min_size, keep.into(), commit, trash),
        Command::Organize {
            path,
            by,
            dest,
            date_format,
            commit,
        } => run_organize(&path, by, &dest, &date_format, commit),
        Command::Cleanup {
            path,
            older_than,
            commit,
            trash,
        } => run_cleanup(&path, older_than.as_deref(), commit, trash),
        Command::Report {
            path,
            min_size,
            output,
        } => run_report(&path, &min_size, output),
    }
}

fn scan(path: &Path) -> Result<Snapshot> {
    let path = path.canonicalize().context("Invalid path")?;
    eprintln!("Scanning {}...", path.display());
    let snapshot = DirScanner::new()
        .scan(&ScanConfig::new(&path))
        .context("Scan failed")?;
    eprintln!(
        "Scanned {} files ({}) in {:.2}s",
        snapshot.file_count(),
        format_size(snapshot.total_size()),
        snapshot.scan_duration.as_secs_f64()
    );
    if snapshot.has_warnings() {
        eprintln!("{} warning(s) during scan", snapshot.warnings.len());
    }
    Ok(snapshot)
}

fn find_duplicates(snapshot: &Snapshot, min_size: &str, max_groups: usize) -> Result<DuplicateReport> {
    let min_bytes = parse_size(min_size)?;
    let config = DuplicateConfig::builder()
        .min_size(min_bytes)
        .max_groups(max_groups)
        .build()
        .context("Invalid duplicate config")?;
    Ok(DuplicateFinder::with_config(config).find_duplicates(snapshot))
}

fn run_usage(path: &Path, top: usize, format: OutputFormat) -> Result<()> {
    let snapshot = scan(path)?;
    let report = UsageAnalyzer::new(top).analyze(&snapshot);

    match format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(60));
            println!(
                " {} - {}",
                snapshot.root.display(),
                format_size(report.total_bytes)
            );
            println!("{}", "─".repeat(60));
            println!();
            println!(" By category:");
            for usage in &report.by_category {
                println!(
                    "   {:<14} {:>10}  {:>6} files",
                    usage.category.to_string(),
                    format_size(usage.bytes),
                    usage.file_count
                );
            }
            if !report.largest_files.is_empty() {
                println!();
                println!(" Largest files:");
                for record in &report.largest_files {
                    println!(
                        "   {:>10}  {}",
                        format_size(record.size),
                        record.path.display()
                    );
                }
            }
            println!();
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn run_duplicates(path: &Path, min_size: &str, top: usize, format: OutputFormat) -> Result<()> {
    let snapshot = scan(path)?;
    eprintln!("Finding duplicates (min size: {})...", min_size);
    let report = find_duplicates(&snapshot, min_size, top)?;

    match format {
        OutputFormat::Text => {
            println!();
            if !report.has_duplicates() {
                println!("No duplicate files found.");
                return Ok(());
            }
            println!(
                "Found {} duplicate groups ({} files, {} hashed of {} considered)",
                report.group_count(),
                report.total_duplicate_files(),
                report.files_hashed,
                report.files_considered
            );
            println!(
                "Total wasted space: {}",
                format_size(report.total_wasted_bytes)
            );
            println!();
            for (i, group) in report.groups.iter().enumerate() {
                println!(
                    "Group {} ({} files, {} each, {} wasted)",
                    i + 1,
                    group.count(),
                    format_size(group.size),
                    format_size(group.wasted_bytes)
                );
                for path in group.paths() {
                    println!("  {}", path.display());
                }
                println!();
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn run_dedupe(
    path: &Path,
    min_size: &str,
    keep: KeepPolicy,
    commit: bool,
    trash: bool,
) -> Result<()> {
    let snapshot = scan(path)?;
    let duplicates = find_duplicates(&snapshot, min_size, 0)?;
    if !duplicates.has_duplicates() {
        println!("No duplicate files found; nothing to do.");
        return Ok(());
    }

    let plan = Planner::new().dedupe(&duplicates, keep);
    plan.validate().context("Invalid plan")?;
    eprintln!(
        "Planned {} deletions reclaiming {}",
        plan.len(),
        format_size(duplicates.total_wasted_bytes)
    );

    execute_and_print(&plan, commit, trash)
}

fn run_organize(
    path: &Path,
    by: OrganizeMode,
    dest: &Path,
    date_format: &str,
    commit: bool,
) -> Result<()> {
    let snapshot = scan(path)?;
    let dest_root = if dest.is_absolute() {
        dest.to_path_buf()
    } else {
        snapshot.root.join(dest)
    };

    let planner = Planner::new();
    let plan = match by {
        OrganizeMode::Type => planner.organize_by_type(&snapshot, &dest_root),
        OrganizeMode::Date => planner
            .organize_by_date(&snapshot, &dest_root, date_format)
            .context("Invalid date format")?,
    };
    plan.validate().context("Invalid plan")?;
    eprintln!("Planned {} moves into {}", plan.len(), dest_root.display());

    execute_and_print(&plan, commit, false)
}

fn run_cleanup(path: &Path, older_than: Option<&str>, commit: bool, trash: bool) -> Result<()> {
    let snapshot = scan(path)?;
    let max_age = older_than.map(parse_duration).transpose()?;

    let config = CleanupConfig::builder()
        .max_age(max_age)
        .build()
        .context("Invalid cleanup config")?;
    let finder = CleanupFinder::with_config(config).context("Invalid cleanup config")?;
    let report = finder.report(&snapshot)?;

    println!();
    println!(
        "Found {} empty dirs, {} temp files, {} old files ({} reclaimable)",
        report.empty_dirs.len(),
        report.temp_files.len(),
        report.old_files.len(),
        format_size(report.reclaimable_bytes)
    );
    for dir in &report.empty_dirs {
        println!("  empty: {}", dir.display());
    }
    for record in report.temp_files.iter().chain(report.old_files.iter()) {
        println!("  {:>10}  {}", format_size(record.size), record.path.display());
    }
    println!();

    // Files first, then empty dirs deepest-first, so dirs emptied by the
    // file deletions still come out in one pass.
    let targets: Vec<PathBuf> = report
        .temp_files
        .iter()
        .chain(report.old_files.iter())
        .map(|r| r.path.clone())
        .chain(report.empty_dirs.iter().cloned())
        .collect();
    if targets.is_empty() {
        return Ok(());
    }

    let plan = Planner::new().delete_targets(snapshot.root.clone(), targets);
    execute_and_print(&plan, commit, trash)
}

fn run_report(path: &Path, min_size: &str, output: Option<PathBuf>) -> Result<()> {
    let snapshot = scan(path)?;
    let usage = UsageAnalyzer::default().analyze(&snapshot);
    let duplicates = find_duplicates(&snapshot, min_size, 0)?;
    let cleanup = CleanupFinder::new()?.report(&snapshot)?;

    let report = FullReport {
        generated_at: chrono::Local::now().to_rfc3339(),
        root: snapshot.root.clone(),
        usage,
        duplicates,
        cleanup,
    };
    let json = serde_json::to_string_pretty(&report)?;

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)?;
            eprintln!("Report written to {}", output_path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Execute a plan and print per-operation outcomes.
fn execute_and_print(plan: &OperationPlan, commit: bool, use_trash: bool) -> Result<()> {
    let executor = Executor::with_options(ExecuteOptions { commit, use_trash });
    let report = executor.apply(plan);

    for outcome in &report.outcomes {
        match &outcome.status {
            OperationStatus::Applied => println!("  done: {}", outcome.operation),
            OperationStatus::SkippedDryRun => println!("  would {}", outcome.operation),
            OperationStatus::Failed { reason } => {
                println!("  FAILED: {} ({})", outcome.operation, reason)
            }
        }
    }
    print_summary(&report);

    Ok(())
}

fn print_summary(report: &ExecutionReport) {
    println!();
    if report.dry_run {
        println!(
            "Dry run: {} operation(s) planned, {} failed checks. Pass --commit to apply.",
            report.skipped_count(),
            report.failed_count()
        );
    } else {
        println!(
            "Applied {} operation(s), {} failed.",
            report.applied_count(),
            report.failed_count()
        );
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Parse a size string (e.g., "1KB", "10MB", "1GB").
fn parse_size(s: &str) -> Result<u64> {
    fn digits(s: &str) -> &str {
        s.trim_end_matches(|c: char| !c.is_ascii_digit() && c != '.')
    }

    let s = s.trim().to_uppercase();

    let (num, multiplier) = if s.ends_with("GB") || s.ends_with('G') {
        let num: f64 = digits(&s).parse()?;
        (num, 1024u64 * 1024 * 1024)
    } else if s.ends_with("MB") || s.ends_with('M') {
        let num: f64 = digits(&s).parse()?;
        (num, 1024 * 1024)
    } else if s.ends_with("KB") || s.ends_with('K') {
        let num: f64 = digits(&s).parse()?;
        (num, 1024)
    } else if s.ends_with('B') {
        let num: f64 = digits(&s).parse()?;
        (num, 1)
    } else {
        let num: f64 = s.parse()?;
        (num, 1)
    };

    Ok((num * multiplier as f64) as u64)
}

/// Parse a duration string (e.g., "1y", "6m", "30d", "1w").
fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();

    let (num, multiplier) = if s.ends_with('y') {
        let num: f64 = s.trim_end_matches('y').parse()?;
        (num, 365.0 * 24.0 * 60.0 * 60.0)
    } else if s.ends_with('m') {
        let num: f64 = s.trim_end_matches('m').parse()?;
        (num, 30.0 * 24.0 * 60.0 * 60.0)
    } else if s.ends_with('w') {
        let num: f64 = s.trim_end_matches('w').parse()?;
        (num, 7.0 * 24.0 * 60.0 * 60.0)
    } else if s.ends_with('d') {
        let num: f64 = s.trim_end_matches('d').parse()?;
        (num, 24.0 * 60.0 * 60.0)
    } else if s.ends_with('h') {
        let num: f64 = s.trim_end_matches('h').parse()?;
        (num, 60.0 * 60.0)
    } else {
        let num: f64 = s.parse()?;
        (num, 24.0 * 60.0 * 60.0) // Default to days
    };

    Ok(Duration::from_secs_f64(num * multiplier))
}
