//! JSON output for scripting and CI.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "records": [
//!     {
//!       "kind": "cross_file_block",
//!       "description": "Found 1 duplicated block shared by a.md and c.md",
//!       "paths": ["a.md", "c.md"],
//!       "blocks": [{ "fingerprint": "75fbf8...", "content": "..." }]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 3,
//!     "total_lines": 42,
//!     "duped_lines": 12,
//!     "num_file_dupes": 1,
//!     "num_block_dupes": 2,
//!     "num_block_dupes_in_same_file": 1
//!   },
//!   "score": 71.43,
//!   "threshold": 95.0,
//!   "passed": false,
//!   "exit_code": 1,
//!   "exit_code_name": "PD001",
//!   "generated_at": "2026-01-01T00:00:00+00:00"
//! }
//! ```

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::text::report_order;
use crate::duplicates::{DuplicateRecord, RunState, Verdict};
use crate::error::ExitCode;

/// A shared block in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonBlock {
    /// BLAKE3 fingerprint of the canonical block (hex)
    pub fingerprint: String,
    /// Block text as it appears in the first file
    pub content: String,
}

/// A record in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRecord {
    /// `whole_file`, `cross_file_block` or `same_file_block`
    pub kind: &'static str,
    /// Plain-English summary
    pub description: String,
    /// Participating files, first occurrence first
    pub paths: Vec<String>,
    /// Document fingerprint for whole-file duplicates, `None` otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_fingerprint: Option<String>,
    /// Shared blocks (empty for whole-file duplicates)
    pub blocks: Vec<JsonBlock>,
}

impl JsonRecord {
    /// Convert a record.
    #[must_use]
    pub fn from_record(record: &DuplicateRecord) -> Self {
        let paths = record
            .paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        let blocks: Vec<JsonBlock> = record
            .contents
            .iter()
            .zip(&record.fingerprints)
            .map(|(content, fp)| JsonBlock {
                fingerprint: fp.to_hex(),
                content: content.clone(),
            })
            .collect();
        let document_fingerprint = if blocks.is_empty() {
            record.fingerprints.first().map(|fp| fp.to_hex())
        } else {
            None
        };
        Self {
            kind: record.kind.label(),
            description: record.describe(),
            paths,
            document_fingerprint,
            blocks,
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Records in report order
    pub records: Vec<JsonRecord>,
    /// Final counters
    pub summary: RunState,
    /// Uniqueness score
    pub score: f64,
    /// Failure threshold
    pub threshold: f64,
    /// Whether the run passed
    pub passed: bool,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "PD001")
    pub exit_code_name: &'static str,
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
}

impl JsonOutput {
    /// Build the output for a finished run.
    #[must_use]
    pub fn new(records: &[DuplicateRecord], state: &RunState, verdict: &Verdict) -> Self {
        let exit_code = ExitCode::from_verdict(verdict.passed);
        Self {
            records: report_order(records)
                .iter()
                .map(JsonRecord::from_record)
                .collect(),
            summary: state.clone(),
            score: verdict.score,
            threshold: verdict.threshold,
            passed: verdict.passed,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix(),
            generated_at: Utc::now(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
