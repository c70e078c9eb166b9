//! Integration tests for layered configuration: defaults, project and user
//! files, the legacy `.trc` format, environment variables and CLI overrides.

use crate::{clear_env, ENV_MUTEX};
use clap::Parser;
use paradupe::cli::{Cli, Commands};
use paradupe::config::{Config, ConfigError};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_no_files_gives_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();

    let config = Config::load_from_sources(None, dir.path(), None).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_project_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(".paradupe.toml"),
        "min_lines = 3\nfailure_threshold = 90.5\nignore = [\"drafts/\"]\npatterns = [\"*.md\"]\n",
    )
    .unwrap();

    let config = Config::load_from_sources(None, dir.path(), None).unwrap();
    assert_eq!(config.min_lines, 3);
    assert_eq!(config.min_chars, 20);
    assert_eq!(config.failure_threshold, 90.5);
    assert_eq!(config.ignore, vec!["drafts/".to_string()]);
    assert_eq!(config.patterns, vec!["*.md".to_string()]);
}

#[test]
fn test_legacy_trc_json() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(".trc"),
        r#"{ "failureThreshold": 80, "minLines": 4, "minChars": 10, "ignore": ["vendor/"] }"#,
    )
    .unwrap();

    let config = Config::load_from_sources(None, dir.path(), None).unwrap();
    assert_eq!(config.failure_threshold, 80.0);
    assert_eq!(config.min_lines, 4);
    assert_eq!(config.min_chars, 10);
    assert_eq!(config.ignore, vec!["vendor/".to_string()]);
}

#[test]
fn test_user_file_is_below_project_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let user_dir = tempdir().unwrap();
    let user = user_dir.path().join("config.toml");
    fs::write(&user, "min_lines = 5\nmin_chars = 7\n").unwrap();
    fs::write(dir.path().join(".paradupe.toml"), "min_lines = 3\n").unwrap();

    let config = Config::load_from_sources(Some(&user), dir.path(), None).unwrap();
    assert_eq!(config.min_lines, 3);
    assert_eq!(config.min_chars, 7);
}

#[test]
fn test_explicit_file_replaces_project_files() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let other = tempdir().unwrap();
    fs::write(dir.path().join(".paradupe.toml"), "min_lines = 9\n").unwrap();
    let explicit = other.path().join("ci.json");
    fs::write(&explicit, r#"{ "min_chars": 5 }"#).unwrap();

    let config = Config::load_from_sources(None, dir.path(), Some(&explicit)).unwrap();
    assert_eq!(config.min_lines, 2);
    assert_eq!(config.min_chars, 5);
}

#[test]
fn test_explicit_file_must_exist() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let result = Config::load_from_sources(None, dir.path(), Some(&missing));
    assert!(matches!(result, Err(ConfigError::NotFound(path)) if path == missing));
}

#[test]
fn test_env_overrides_files() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".paradupe.toml"), "min_chars = 30\n").unwrap();

    std::env::set_var("PARADUPE_MIN_CHARS", "50");
    std::env::set_var("PARADUPE_SKIP_HIDDEN", "false");
    let config = Config::load_from_sources(None, dir.path(), None);
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.min_chars, 50);
    assert!(!config.skip_hidden);
}

#[test]
fn test_cli_overrides_everything() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(".paradupe.toml"),
        "min_lines = 4\nignore = [\"drafts/\"]\n",
    )
    .unwrap();

    std::env::set_var("PARADUPE_MIN_LINES", "6");
    let loaded = Config::load_from_sources(None, dir.path(), None);
    clear_env();
    let mut config = loaded.unwrap();
    assert_eq!(config.min_lines, 6);

    let cli = Cli::try_parse_from([
        "paradupe",
        "scan",
        "--min-lines",
        "1",
        "-i",
        "*.lock",
        "--threshold",
        "70%",
    ])
    .unwrap();
    let Commands::Scan(args) = cli.command;
    config.apply(&args.overrides());

    assert_eq!(config.min_lines, 1);
    assert_eq!(config.failure_threshold, 70.0);
    assert_eq!(
        config.ignore,
        vec!["drafts/".to_string(), "*.lock".to_string()]
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_malformed_values_are_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".paradupe.toml"), "min_lines = \"many\"\n").unwrap();
    assert!(matches!(
        Config::load_from_sources(None, dir.path(), None),
        Err(ConfigError::Load(_))
    ));

    fs::write(dir.path().join(".paradupe.toml"), "min_chars = -1\n").unwrap();
    assert!(Config::load_from_sources(None, dir.path(), None).is_err());

    fs::write(dir.path().join(".paradupe.toml"), "min_lines = [").unwrap();
    assert!(Config::load_from_sources(None, dir.path(), None).is_err());
}

#[test]
fn test_out_of_range_threshold_fails_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".paradupe.toml"), "failure_threshold = 120\n").unwrap();

    let config = Config::load_from_sources(None, dir.path(), None).unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThreshold(t)) if t == 120.0
    ));
}

#[test]
fn test_unknown_keys_are_tolerated() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(".paradupe.toml"),
        "min_line = 3\nmin_chars = 25\n",
    )
    .unwrap();

    let config = Config::load_from_sources(None, dir.path(), None).unwrap();
    assert_eq!(config.min_lines, 2);
    assert_eq!(config.min_chars, 25);
}
