//! Duplicate records produced by the classifier.
//!
//! A record describes one duplication group: the files taking part and, for
//! block-level findings, the excerpts they share. Records grow in place as
//! later documents join an existing group, so a group is never reported
//! twice.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::scanner::Fingerprint;

/// Kind of duplication a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    /// Files whose canonical content is identical
    #[serde(rename = "whole_file")]
    WholeFileDuplicate,
    /// Blocks shared between two or more distinct files
    #[serde(rename = "cross_file_block")]
    CrossFileBlockDuplicate,
    /// A block repeated inside a single file
    #[serde(rename = "same_file_block")]
    SameFileBlockDuplicate,
}

impl RecordKind {
    /// Position in the rendered report. Whole-file duplicates come last so
    /// they stay on screen after the report scrolls.
    #[must_use]
    pub fn report_rank(self) -> u8 {
        match self {
            Self::SameFileBlockDuplicate => 0,
            Self::CrossFileBlockDuplicate => 1,
            Self::WholeFileDuplicate => 2,
        }
    }

    /// Short label used by tabular outputs.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::WholeFileDuplicate => "whole_file",
            Self::CrossFileBlockDuplicate => "cross_file_block",
            Self::SameFileBlockDuplicate => "same_file_block",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One consolidated duplication finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRecord {
    /// What kind of duplication this is
    pub kind: RecordKind,
    /// Participating files in the order they joined, without repeats
    pub paths: Vec<PathBuf>,
    /// Original text of each shared block, parallel to `fingerprints`.
    /// Empty for whole-file duplicates.
    pub contents: Vec<String>,
    /// Block fingerprints this record covers. For whole-file duplicates this
    /// holds the single document fingerprint.
    pub fingerprints: Vec<Fingerprint>,
}

impl DuplicateRecord {
    /// Record two files with identical canonical content.
    #[must_use]
    pub fn whole_file(first: &Path, duplicate: &Path, document: Fingerprint) -> Self {
        let mut record = Self {
            kind: RecordKind::WholeFileDuplicate,
            paths: vec![first.to_path_buf()],
            contents: Vec::new(),
            fingerprints: vec![document],
        };
        record.add_path(duplicate);
        record
    }

    /// Record a block shared by two different files, origin first.
    #[must_use]
    pub fn cross_file(origin: &Path, current: &Path, content: &str, block: Fingerprint) -> Self {
        let mut record = Self {
            kind: RecordKind::CrossFileBlockDuplicate,
            paths: vec![origin.to_path_buf()],
            contents: vec![content.to_string()],
            fingerprints: vec![block],
        };
        record.add_path(current);
        record
    }

    /// Record a block repeated inside one file.
    #[must_use]
    pub fn same_file(path: &Path, content: &str, block: Fingerprint) -> Self {
        Self {
            kind: RecordKind::SameFileBlockDuplicate,
            paths: vec![path.to_path_buf()],
            contents: vec![content.to_string()],
            fingerprints: vec![block],
        }
    }

    /// Add a participant. Returns `false` if it was already present.
    pub fn add_path(&mut self, path: &Path) -> bool {
        if self.contains_path(path) {
            return false;
        }
        self.paths.push(path.to_path_buf());
        true
    }

    /// Add a shared block. Returns `false` if the fingerprint is already covered.
    pub fn add_block(&mut self, content: &str, block: Fingerprint) -> bool {
        if self.fingerprints.contains(&block) {
            return false;
        }
        self.contents.push(content.to_string());
        self.fingerprints.push(block);
        true
    }

    /// Whether `path` participates in this record.
    #[must_use]
    pub fn contains_path(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Number of distinct shared blocks (zero for whole-file duplicates).
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.contents.len()
    }

    /// Plain-English summary of the finding.
    ///
    /// This is the rendering hook used by every report format; excerpts are
    /// left to the caller.
    #[must_use]
    pub fn describe(&self) -> String {
        let files = join_paths(&self.paths);
        match self.kind {
            RecordKind::WholeFileDuplicate => {
                format!("The following files are exact duplicates: {files}")
            }
            RecordKind::CrossFileBlockDuplicate => {
                let blocks = self.block_count();
                let noun = if blocks == 1 { "block" } else { "blocks" };
                format!("Found {blocks} duplicated {noun} shared by {files}")
            }
            RecordKind::SameFileBlockDuplicate => {
                let blocks = self.block_count();
                let noun = if blocks == 1 { "block" } else { "blocks" };
                format!("Found {blocks} {noun} repeated within {files}")
            }
        }
    }
}

/// Join paths as "a", "a and b" or "a, b and c".
fn join_paths(paths: &[PathBuf]) -> String {
    let names: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {last}", rest.join(", ")),
    }
}

/// Order records for display: same-file, then cross-file, then whole-file.
///
/// The sort is stable, so records of one kind keep discovery order.
pub fn sort_for_report(records: &mut [DuplicateRecord]) {
    records.sort_by_key(|r| r.kind.report_rank());
}
