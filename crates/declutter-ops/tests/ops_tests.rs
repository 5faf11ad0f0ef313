//! End-to-end tests: scan, analyze, plan, execute.

use std::fs;
use std::path::Path;

use declutter_analyze::{DuplicateConfig, DuplicateFinder, DuplicateReport};
use declutter_ops::{
    ExecuteOptions, Executor, KeepPolicy, Operation, OperationPlan, OperationStatus, Planner,
};
use declutter_scan::{DirScanner, ScanConfig};
use tempfile::TempDir;

fn scan(root: &Path) -> declutter_ops::Snapshot {
    DirScanner::new().scan(&ScanConfig::new(root)).unwrap()
}

fn duplicates(root: &Path) -> DuplicateReport {
    let config = DuplicateConfig::builder().min_size(1u64).build().unwrap();
    DuplicateFinder::with_config(config).find_duplicates(&scan(root))
}

fn commit() -> Executor {
    Executor::with_options(ExecuteOptions {
        commit: true,
        use_trash: false,
    })
}

#[test]
fn dedupe_keeps_exactly_one_copy_per_group() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("a.txt"), "payload one").unwrap();
    fs::write(root.join("sub/a_copy.txt"), "payload one").unwrap();
    fs::write(root.join("b.txt"), "payload two!").unwrap();
    fs::write(root.join("sub/b_copy.txt"), "payload two!").unwrap();
    fs::write(root.join("unique.txt"), "nothing like me").unwrap();

    let report = duplicates(root);
    assert_eq!(report.group_count(), 2);

    let plan = Planner::new().dedupe(&report, KeepPolicy::FirstDiscovered);
    assert_eq!(plan.len(), 2);
    let exec_report = commit().apply(&plan);
    assert!(exec_report.is_clean());
    assert_eq!(exec_report.applied_count(), 2);

    // Every distinct content survives, and no duplicates remain.
    let after = duplicates(root);
    assert!(!after.has_duplicates());
    let mut contents: Vec<String> = scan(root)
        .records
        .iter()
        .map(|r| fs::read_to_string(&r.path).unwrap())
        .collect();
    contents.sort();
    assert_eq!(
        contents,
        vec!["nothing like me", "payload one", "payload two!"]
    );
}

#[test]
fn dedupe_shortest_path_policy_keeps_top_level_copy() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("deeply/nested")).unwrap();
    fs::write(root.join("deeply/nested/doc.txt"), "same words").unwrap();
    fs::write(root.join("doc.txt"), "same words").unwrap();

    let plan = Planner::new().dedupe(&duplicates(root), KeepPolicy::ShortestPath);
    commit().apply(&plan);

    assert!(root.join("doc.txt").exists());
    assert!(!root.join("deeply/nested/doc.txt").exists());
}

#[test]
fn dry_run_leaves_the_tree_untouched() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("a.txt"), "duplicate!").unwrap();
    fs::write(root.join("b.txt"), "duplicate!").unwrap();

    let before = scan(root);
    let plan = Planner::new().dedupe(&duplicates(root), KeepPolicy::FirstDiscovered);
    let report = Executor::new().apply(&plan);

    assert!(report.dry_run);
    assert_eq!(report.outcomes.len(), plan.len());
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.status == OperationStatus::SkippedDryRun));

    let after = scan(root);
    let paths = |s: &declutter_ops::Snapshot| -> Vec<_> {
        s.records.iter().map(|r| r.path.clone()).collect()
    };
    assert_eq!(paths(&before), paths(&after));
}

#[test]
fn partial_failure_is_isolated() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    for name in ["a", "b", "c", "d", "e"] {
        fs::write(root.join(format!("{name}.txt")), name).unwrap();
    }

    let mut operations = Vec::new();
    for name in ["a", "b", "c", "d", "e"] {
        operations.push(Operation::Move {
            source: root.join(format!("{name}.txt")),
            destination: root.join(format!("moved/{name}.txt")),
        });
    }
    // Third operation's source vanishes before execution.
    fs::remove_file(root.join("c.txt")).unwrap();

    let report = commit().apply(&OperationPlan::new(root, operations));

    assert_eq!(report.outcomes.len(), 5);
    assert_eq!(report.applied_count(), 4);
    assert_eq!(report.failed_count(), 1);
    assert!(report.outcomes[2].status.is_failed());
    for name in ["a", "b", "d", "e"] {
        assert!(root.join(format!("moved/{name}.txt")).exists());
    }
}

#[test]
fn organize_by_type_sorts_into_category_folders() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("notes.txt"), "words").unwrap();
    fs::write(root.join("photo.jpg"), "image bytes").unwrap();
    fs::write(root.join("mystery.xyz"), "???").unwrap();

    let snapshot = scan(root);
    let plan = Planner::new().organize_by_type(&snapshot, &snapshot.root.join("sorted"));
    let report = commit().apply(&plan);

    assert!(report.is_clean());
    assert!(root.join("sorted/documents/notes.txt").exists());
    assert!(root.join("sorted/images/photo.jpg").exists());
    assert!(root.join("sorted/other/mystery.xyz").exists());
}

#[test]
fn organize_collisions_get_numbered_names() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir(root.join("inbox")).unwrap();
    fs::write(root.join("report.txt"), "v1").unwrap();
    fs::write(root.join("inbox/report.txt"), "v2").unwrap();

    let snapshot = scan(root);
    let plan = Planner::new().organize_by_type(&snapshot, &snapshot.root.join("sorted"));
    let report = commit().apply(&plan);

    assert!(report.is_clean());
    assert!(root.join("sorted/documents/report.txt").exists());
    assert!(root.join("sorted/documents/report (1).txt").exists());
}

#[test]
fn plans_are_deterministic() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("x.txt"), "same stuff").unwrap();
    fs::write(root.join("sub/y.txt"), "same stuff").unwrap();
    fs::write(root.join("z.jpg"), "other stuff").unwrap();

    let planner = Planner::new();
    let plan_a = planner.dedupe(&duplicates(root), KeepPolicy::FirstDiscovered);
    let plan_b = planner.dedupe(&duplicates(root), KeepPolicy::FirstDiscovered);
    assert_eq!(plan_a.operations, plan_b.operations);

    let snapshot = scan(root);
    let dest = snapshot.root.join("sorted");
    let org_a = planner.organize_by_type(&snapshot, &dest);
    let org_b = planner.organize_by_type(&scan(root), &dest);
    assert_eq!(org_a.operations, org_b.operations);
}

#[test]
fn delete_plan_from_explicit_targets() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("junk.tmp"), "junk").unwrap();
    fs::create_dir(root.join("empty")).unwrap();

    let plan = Planner::new().delete_targets(
        root,
        vec![root.join("junk.tmp"), root.join("empty")],
    );
    let report = commit().apply(&plan);

    assert!(report.is_clean());
    assert!(!root.join("junk.tmp").exists());
    assert!(!root.join("empty").exists());
}
