//! CSV output, one row per (record, participating file).
//!
//! # Columns
//!
//! - `record_id`: 1-based record number in report order
//! - `kind`: `whole_file`, `cross_file_block` or `same_file_block`
//! - `path`: participating file
//! - `role`: `first` for the first occurrence, `duplicate` otherwise
//! - `blocks`: shared block count (0 for whole-file duplicates)
//! - `fingerprints`: `;`-separated hex fingerprints

use std::io;

use serde::Serialize;
use thiserror::Error;

use super::text::report_order;
use crate::duplicates::DuplicateRecord;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    record_id: usize,
    kind: &'static str,
    path: String,
    role: &'static str,
    blocks: usize,
    fingerprints: &'a str,
}

/// CSV output formatter.
pub struct CsvOutput {
    records: Vec<DuplicateRecord>,
}

impl CsvOutput {
    /// Create a formatter; records are put in report order.
    #[must_use]
    pub fn new(records: &[DuplicateRecord]) -> Self {
        Self {
            records: report_order(records),
        }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (idx, record) in self.records.iter().enumerate() {
            let fingerprints = record
                .fingerprints
                .iter()
                .map(|fp| fp.to_hex())
                .collect::<Vec<_>>()
                .join(";");

            for (position, path) in record.paths.iter().enumerate() {
                csv_writer.serialize(CsvRow {
                    record_id: idx + 1,
                    kind: record.kind.label(),
                    path: path.to_string_lossy().into_owned(),
                    role: if position == 0 { "first" } else { "duplicate" },
                    blocks: record.block_count(),
                    fingerprints: &fingerprints,
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
