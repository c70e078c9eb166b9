//! Command-line interface definitions for paradupe.
//!
//! Defined with the clap derive API: global options (verbosity, color, error
//! format) followed by the `scan` subcommand.
//!
//! # Example
//!
//! ```bash
//! # Scan the current directory with the default threshold
//! paradupe scan
//!
//! # Only markdown files, fail below 90%
//! paradupe scan docs/ -p '**/*.md' --threshold 90%
//!
//! # Machine-readable output
//! paradupe scan src/ --output json
//!
//! # Verbose mode for debugging
//! paradupe -v scan .
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::output::text::DEFAULT_EXCERPT_LINES;

/// Find repeated paragraphs across a set of text files.
///
/// paradupe splits every file into blank-line-separated blocks, fingerprints
/// them with BLAKE3 after stripping whitespace, and reports whole-file copies,
/// blocks shared between files and blocks repeated within a file. The run
/// fails when the uniqueness score drops below the configured threshold.
#[derive(Debug, Parser)]
#[command(name = "paradupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors and the report
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON objects on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan files for duplicated content
    Scan(ScanArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Files or directories to scan
    #[arg(value_name = "PATH", default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Include glob (can be specified multiple times; default: all files)
    #[arg(short, long = "pattern", value_name = "GLOB")]
    pub patterns: Vec<String>,

    /// Gitignore-style pattern to skip (can be specified multiple times)
    ///
    /// Added to the configured ignore list and any root .gitignore.
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Minimum newline count for a block to be matched
    #[arg(long, value_name = "N")]
    pub min_lines: Option<usize>,

    /// A block must be longer than this many characters to be matched
    #[arg(long, value_name = "N")]
    pub min_chars: Option<usize>,

    /// Minimum passing uniqueness score (e.g., 95, 95.5, 95%)
    #[arg(long, value_name = "PCT", value_parser = parse_percentage)]
    pub threshold: Option<f64>,

    /// Config file to use instead of .paradupe.toml / .trc
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Lines of each shared block shown in the text report (0 hides excerpts)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_EXCERPT_LINES)]
    pub excerpt_lines: usize,

    /// Number of reader threads (default: 4)
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Follow symbolic links during the walk
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Also scan hidden files and directories (starting with .)
    #[arg(long)]
    pub hidden: bool,
}

impl ScanArgs {
    /// Flags that override file and environment configuration.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            min_lines: self.min_lines,
            min_chars: self.min_chars,
            failure_threshold: self.threshold,
            ignore: self.ignore_patterns.clone(),
            patterns: self.patterns.clone(),
            io_threads: self.io_threads,
            follow_symlinks: self.follow_symlinks,
            include_hidden: self.hidden,
        }
    }
}

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// JSON for scripting
    Json,
    /// CSV for spreadsheets
    Csv,
}

impl OutputFormat {
    /// Whether the format is meant for other programs.
    #[must_use]
    pub fn is_machine_readable(self) -> bool {
        !matches!(self, OutputFormat::Text)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a percentage between 0 and 100.
///
/// A trailing `%` is optional.
///
/// # Examples
///
/// ```
/// use paradupe::cli::parse_percentage;
///
/// assert_eq!(parse_percentage("95").unwrap(), 95.0);
/// assert_eq!(parse_percentage("95.5").unwrap(), 95.5);
/// assert_eq!(parse_percentage("80%").unwrap(), 80.0);
/// assert!(parse_percentage("101").is_err());
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, not a number, or outside 0..=100.
pub fn parse_percentage(s: &str) -> Result<f64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Percentage cannot be empty".to_string());
    }

    let num_str = s.strip_suffix('%').unwrap_or(s).trim();
    let value: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    if !(0.0..=100.0).contains(&value) {
        return Err(format!("Percentage must be between 0 and 100, got {value}"));
    }

    Ok(value)
}
