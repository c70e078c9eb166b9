use crate::{clear_env, ENV_MUTEX};
use clap::Parser;
use paradupe::cli::{Cli, Commands};
use paradupe::error::ExitCode;
use paradupe::execute_scan;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const P1: &str = "alpha one\nalpha two\nalpha three";
const P2: &str = "bravo one\nbravo two\nbravo three";
const P3: &str = "charlie one\ncharlie two\ncharlie three";

/// Corpus with a whole-file copy and one shared paragraph.
fn corpus() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), format!("{P1}\n\n{P2}\n")).unwrap();
    fs::write(dir.path().join("b.md"), format!("{P1}\n\n{P2}\n")).unwrap();
    fs::write(dir.path().join("c.md"), format!("{P3}\n\n{P1}\n")).unwrap();
    dir
}

/// Run `paradupe scan <root> --config <empty file> <extra...>` into a buffer.
fn run_scan(root: &Path, extra: &[&str]) -> (anyhow::Result<ExitCode>, String) {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();

    let config_dir = tempdir().unwrap();
    let config = config_dir.path().join("paradupe.toml");
    fs::write(&config, "").unwrap();

    let mut argv = vec![
        "paradupe".to_string(),
        "-q".to_string(),
        "scan".to_string(),
        root.display().to_string(),
        "--config".to_string(),
        config.display().to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    let cli = Cli::try_parse_from(argv).unwrap();
    let Commands::Scan(args) = cli.command;

    let mut out = Vec::new();
    let result = execute_scan(&args, true, false, &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_text_report_below_threshold() {
    let dir = corpus();
    let (result, text) = run_scan(dir.path(), &[]);

    assert_eq!(result.unwrap(), ExitCode::BelowThreshold);
    let cross = text.find("Found 1 duplicated block shared by").unwrap();
    let whole = text.find("The following files are exact duplicates:").unwrap();
    assert!(cross < whole);
    assert!(text.contains("    alpha one\n"));
    assert!(text.contains("You failed your threshold of 95% with a score of 52.38%"));
}

#[test]
fn test_text_report_passes_with_lower_threshold() {
    let dir = corpus();
    let (result, text) = run_scan(dir.path(), &["--threshold", "50"]);

    assert_eq!(result.unwrap(), ExitCode::Success);
    assert!(text.contains("You passed your threshold of 50% with a score of 52.38%"));
}

#[test]
fn test_text_report_without_excerpts() {
    let dir = corpus();
    let (result, text) = run_scan(dir.path(), &["--excerpt-lines", "0"]);

    assert_eq!(result.unwrap(), ExitCode::BelowThreshold);
    assert!(text.contains("Found 1 duplicated block shared by"));
    assert!(!text.contains("    alpha one\n"));
}

#[test]
fn test_json_report() {
    let dir = corpus();
    let (result, json) = run_scan(dir.path(), &["--output", "json"]);
    assert_eq!(result.unwrap(), ExitCode::BelowThreshold);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["score"], 52.38);
    assert_eq!(value["passed"], false);
    assert_eq!(value["exit_code"], 1);
    assert_eq!(value["summary"]["total_files"], 3);
    assert_eq!(value["summary"]["duped_lines"], 10);

    let records = value["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["kind"], "cross_file_block");
    assert_eq!(records[1]["kind"], "whole_file");
    assert_eq!(records[1]["paths"].as_array().unwrap().len(), 2);
}

#[test]
fn test_csv_report() {
    let dir = corpus();
    let (result, csv) = run_scan(dir.path(), &["--output", "csv"]);
    assert_eq!(result.unwrap(), ExitCode::BelowThreshold);

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "record_id,kind,path,role,blocks,fingerprints");
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("1,cross_file_block,"));
    assert!(lines[1].contains("a.md,first,1,"));
    assert!(lines[2].contains("c.md,duplicate,1,"));
    assert!(lines[4].starts_with("2,whole_file,"));
}

#[test]
fn test_cli_block_size_flags() {
    let dir = corpus();
    // paragraphs have at most 3 newlines, so nothing qualifies
    let (result, json) = run_scan(dir.path(), &["--min-lines", "4", "-o", "json"]);
    assert_eq!(result.unwrap(), ExitCode::BelowThreshold);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["num_block_dupes"], 0);
    assert_eq!(value["summary"]["num_file_dupes"], 1);
    assert_eq!(value["records"].as_array().unwrap().len(), 1);
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = corpus();
    let (result, out) = run_scan(dir.path(), &["--io-threads", "0"]);

    let err = result.unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    assert!(format!("{err:#}").contains("io_threads must be at least 1"));
    assert!(out.is_empty());
}
