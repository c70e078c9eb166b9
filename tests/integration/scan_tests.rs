use paradupe::config::Config;
use paradupe::duplicates::RecordKind;
use paradupe::{scan, ScanReport};
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

const P1: &str = "alpha one\nalpha two\nalpha three";
const P2: &str = "bravo one\nbravo two\nbravo three";
const P3: &str = "charlie one\ncharlie two\ncharlie three";

fn run(root: &Path, config: &Config) -> ScanReport {
    scan(
        vec![root.to_path_buf()],
        config,
        Arc::new(AtomicBool::new(false)),
        None,
    )
    .unwrap()
}

fn names(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let report = run(dir.path(), &Config::default());

    assert!(report.records.is_empty());
    assert_eq!(report.state.total_files, 0);
    assert_eq!(report.verdict.score, 100.0);
    assert!(report.verdict.passed);
}

#[test]
fn test_whole_file_copy_with_cross_file_overlap() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), format!("{P1}\n\n{P2}\n")).unwrap();
    // same text, different spacing
    fs::write(
        dir.path().join("b.md"),
        format!("{P1}\n\n{}\n", P2.replace(' ', "   ")),
    )
    .unwrap();
    fs::write(dir.path().join("c.md"), format!("{P3}\n\n{P1}\n")).unwrap();

    let report = run(dir.path(), &Config::default());

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].kind, RecordKind::WholeFileDuplicate);
    assert_eq!(names(&report.records[0].paths), vec!["a.md", "b.md"]);
    assert_eq!(report.records[1].kind, RecordKind::CrossFileBlockDuplicate);
    assert_eq!(names(&report.records[1].paths), vec!["a.md", "c.md"]);
    assert_eq!(report.records[1].contents, vec![format!("{P1}\n")]);

    let state = &report.state;
    assert_eq!(state.total_files, 3);
    assert_eq!(state.total_lines, 21);
    assert_eq!(state.num_file_dupes, 1);
    assert_eq!(state.num_block_dupes, 1);
    assert_eq!(state.num_block_dupes_in_same_file, 0);
    assert_eq!(state.duped_lines, 10);
    assert_eq!(report.verdict.score, 52.38);
    assert!(!report.verdict.passed);
}

#[test]
fn test_paragraph_repeated_in_one_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("d.md"), format!("{P1}\n\n{P2}\n\n{P1}\n")).unwrap();

    let report = run(dir.path(), &Config::default());

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.kind, RecordKind::SameFileBlockDuplicate);
    assert_eq!(names(&record.paths), vec!["d.md"]);
    assert_eq!(record.block_count(), 1);

    assert_eq!(report.state.num_block_dupes, 1);
    assert_eq!(report.state.num_block_dupes_in_same_file, 1);
    assert_eq!(report.state.total_lines, 11);
    assert_eq!(report.state.duped_lines, 3);
    assert_eq!(report.verdict.score, 72.73);
}

#[test]
fn test_third_file_joins_existing_block_record() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x.md"), format!("{P1}\n")).unwrap();
    fs::write(dir.path().join("y.md"), format!("{P2}\n\n{P1}\n")).unwrap();
    fs::write(dir.path().join("z.md"), format!("{P3}\n\n{P1}\n")).unwrap();

    let report = run(dir.path(), &Config::default());

    assert_eq!(report.records.len(), 1);
    assert_eq!(names(&report.records[0].paths), vec!["x.md", "y.md", "z.md"]);
    assert_eq!(report.records[0].block_count(), 1);
    assert_eq!(report.state.num_block_dupes, 2);
}

#[test]
fn test_blocks_shared_by_one_pair_are_consolidated() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("p.md"), format!("{P1}\n\n{P2}\n")).unwrap();
    fs::write(dir.path().join("q.md"), format!("{P2}\n\n{P3}\n\n{P1}\n")).unwrap();

    let report = run(dir.path(), &Config::default());

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(names(&record.paths), vec!["p.md", "q.md"]);
    assert_eq!(record.contents, vec![P2.to_string(), format!("{P1}\n")]);
    assert_eq!(report.state.num_block_dupes, 2);
}

#[test]
fn test_small_blocks_are_not_matched() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("m.md"), "hi\n\nsomething only m says\n").unwrap();
    fs::write(dir.path().join("n.md"), "hi\n\nsomething only n says\n").unwrap();

    let report = run(dir.path(), &Config::default());

    assert!(report.records.is_empty());
    assert_eq!(report.state.num_block_dupes, 0);
    assert_eq!(report.verdict.score, 100.0);
}

#[test]
fn test_include_patterns_and_default_ignores() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), format!("{P1}\n")).unwrap();
    fs::write(dir.path().join("a.txt"), format!("{P1}\n")).unwrap();
    fs::create_dir(dir.path().join("node_modules")).unwrap();
    fs::write(dir.path().join("node_modules/vendored.md"), format!("{P1}\n")).unwrap();

    let config = Config {
        patterns: vec!["*.md".to_string()],
        ..Config::default()
    };
    let report = run(dir.path(), &config);

    assert_eq!(report.state.total_files, 1);
    assert!(report.records.is_empty());
}

#[test]
fn test_threshold_controls_verdict() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), format!("{P1}\n\n{P2}\n")).unwrap();
    fs::write(dir.path().join("b.md"), format!("{P3}\n\n{P1}\n")).unwrap();

    // 3 of 14 lines duplicated
    let lenient = Config {
        failure_threshold: 75.0,
        ..Config::default()
    };
    let report = run(dir.path(), &lenient);
    assert_eq!(report.verdict.score, 78.57);
    assert!(report.verdict.passed);

    let strict = Config::default();
    assert!(!run(dir.path(), &strict).verdict.passed);
}

#[test]
fn test_multiple_roots_and_file_roots() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    let a = first.path().join("a.md");
    let b = second.path().join("b.md");
    fs::write(&a, format!("{P1}\n")).unwrap();
    fs::write(&b, format!("{P1}\n")).unwrap();

    let report = scan(
        vec![a.clone(), second.path().to_path_buf(), a.clone()],
        &Config::default(),
        Arc::new(AtomicBool::new(false)),
        None,
    )
    .unwrap();

    assert_eq!(report.state.total_files, 2);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].paths, vec![a, b]);
}

#[test]
fn test_repeated_runs_are_identical() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), format!("{P1}\n\n{P2}\n\n{P1}\n")).unwrap();
    fs::write(dir.path().join("b.md"), format!("{P2}\n\n{P3}\n")).unwrap();
    fs::write(dir.path().join("c.md"), format!("{P2}\n\n{P3}\n")).unwrap();

    let first = run(dir.path(), &Config::default());
    let second = run(dir.path(), &Config::default());

    assert_eq!(first.records, second.records);
    assert_eq!(first.state, second.state);
    assert_eq!(first.verdict, second.verdict);
}

#[test]
fn test_hidden_files_and_project_config_not_scanned() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "first line\nsecond line\n").unwrap();
    fs::write(dir.path().join(".trc"), "{\n  \"minLines\": 2\n}\n").unwrap();
    fs::write(dir.path().join(".paradupe.toml"), "min_chars = 20\n").unwrap();
    fs::create_dir(dir.path().join(".github")).unwrap();
    fs::write(dir.path().join(".github").join("ci.yml"), "on: push\njobs: {}\n").unwrap();

    let report = run(dir.path(), &Config::default());
    assert_eq!(report.state.total_files, 1);
    assert_eq!(report.state.total_lines, 2);

    // hidden files opt in, project config files stay out
    let config = Config {
        skip_hidden: false,
        ..Default::default()
    };
    let report = run(dir.path(), &config);
    assert_eq!(report.state.total_files, 2);
    assert_eq!(report.state.total_lines, 4);
}
