//! paradupe - paragraph-level duplicate text detector
//!
//! Splits text files into blank-line-separated blocks, fingerprints whole
//! files and blocks with BLAKE3 after stripping whitespace, and reports:
//!
//! - whole-file duplicates
//! - blocks shared between files
//! - blocks repeated within one file
//!
//! A uniqueness score (percentage of lines not flagged) is compared with a
//! failure threshold so the tool can gate CI runs.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::Context;

use cli::{Cli, Commands, OutputFormat, ScanArgs};
use config::Config;
use duplicates::{Classifier, DuplicateRecord, RunState, Verdict};
use error::ExitCode;
use output::{CsvOutput, JsonOutput, TextReport};
use progress::{Progress, ProgressCallback};
use scanner::{load_documents, LoaderConfig, Walker};

/// Result of a complete scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Records in creation order
    pub records: Vec<DuplicateRecord>,
    /// Final counters
    pub state: RunState,
    /// Score against the configured threshold
    pub verdict: Verdict,
}

/// Run the application for parsed arguments.
///
/// # Errors
///
/// Returns an error for invalid configuration, unreadable input, an
/// interrupted run, or a failure writing the report.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    match cli.command {
        Commands::Scan(args) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            execute_scan(&args, cli.quiet, !cli.no_color, &mut out)
        }
    }
}

/// Load configuration, scan, and write the report to `out`.
///
/// # Errors
///
/// See [`run_app`].
pub fn execute_scan<W: Write>(
    args: &ScanArgs,
    quiet: bool,
    color: bool,
    out: &mut W,
) -> anyhow::Result<ExitCode> {
    let mut config =
        Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    config.apply(&args.overrides());
    config.validate().context("Invalid configuration")?;
    log::debug!(
        "Effective configuration:\n{}",
        toml::to_string(&config).unwrap_or_default()
    );

    let handler = signal::install_handler()?;
    let progress: Option<Arc<dyn ProgressCallback>> =
        if quiet || args.output.is_machine_readable() {
            None
        } else {
            Some(Arc::new(Progress::new(false)))
        };

    let report = scan(args.paths.clone(), &config, handler.get_flag(), progress)?;

    match args.output {
        OutputFormat::Text => TextReport::new(&report.records, &report.state, &report.verdict)
            .with_color(color)
            .with_excerpt_lines(args.excerpt_lines)
            .write_to(out)
            .context("Failed to write report")?,
        OutputFormat::Json => JsonOutput::new(&report.records, &report.state, &report.verdict)
            .write_to(out, true)
            .context("Failed to write JSON report")?,
        OutputFormat::Csv => CsvOutput::new(&report.records)
            .write_to(&mut *out)
            .context("Failed to write CSV report")?,
    }
    out.flush().context("Failed to write report")?;

    Ok(ExitCode::from_verdict(report.verdict.passed))
}

/// Discover, load and classify every file under `roots`.
///
/// # Errors
///
/// - Discovery errors (missing root, bad pattern)
/// - [`scanner::LoadError`] if any file cannot be read or the run is interrupted
pub fn scan(
    roots: Vec<PathBuf>,
    config: &Config,
    shutdown_flag: Arc<AtomicBool>,
    progress: Option<Arc<dyn ProgressCallback>>,
) -> anyhow::Result<ScanReport> {
    let mut walker =
        Walker::new(roots, config.walker_config()).with_shutdown_flag(Arc::clone(&shutdown_flag));
    let mut loader_config = LoaderConfig::default()
        .with_io_threads(config.io_threads)
        .with_shutdown_flag(shutdown_flag);
    let mut classifier = Classifier::new(config.block_filter());
    if let Some(callback) = progress {
        walker = walker.with_progress_callback(Arc::clone(&callback));
        loader_config = loader_config.with_progress_callback(Arc::clone(&callback));
        classifier = classifier.with_progress_callback(callback);
    }

    let paths = walker.collect_paths().context("Failed to discover files")?;

    let documents = load_documents(paths, &loader_config).context("Failed to load documents")?;

    let mut state = RunState::for_corpus(&documents);
    let records = classifier.classify(&documents, &mut state);
    let verdict = Verdict::evaluate(&state, config.failure_threshold);
    log::info!("{}", verdict.summary());

    Ok(ScanReport {
        records,
        state,
        verdict,
    })
}
