//! Single-pass duplicate classification.
//!
//! # Overview
//!
//! The classifier walks the corpus once, in input order, and sorts every
//! repeated piece of text into one of three record kinds:
//!
//! 1. **Whole-file**: the document's minified content was seen before. The
//!    document joins the existing whole-file record and its blocks are not
//!    matched any further.
//! 2. **Same-file block**: a qualifying block whose first sighting was in the
//!    same document.
//! 3. **Cross-file block**: a qualifying block first seen in another document.
//!    All blocks shared by the same pair of files land in one record.
//!
//! The first occurrence of anything is always the canonical source; later
//! occurrences are matched against it and never the other way round.
//!
//! # Example
//!
//! ```
//! use paradupe::duplicates::{classify, RecordKind};
//! use paradupe::scanner::{BlockFilter, Document};
//!
//! let docs = vec![
//!     Document::new("a.txt", "same text\n", 0),
//!     Document::new("b.txt", "same  text\n", 1),
//! ];
//! let result = classify(&docs, BlockFilter::new(2, 20));
//!
//! assert_eq!(result.records.len(), 1);
//! assert_eq!(result.records[0].kind, RecordKind::WholeFileDuplicate);
//! assert_eq!(result.state.num_file_dupes, 1);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use super::records::DuplicateRecord;
use crate::progress::ProgressCallback;
use crate::scanner::{fingerprint, minify, segment, BlockFilter, Document, Fingerprint};

/// Counters accumulated over one run.
///
/// Created fresh for every run; nothing here outlives the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunState {
    /// Number of loaded documents
    pub total_files: usize,
    /// Sum of newline counts over all loaded documents
    pub total_lines: usize,
    /// Lines attributed to duplicated files and blocks
    pub duped_lines: usize,
    /// Documents classified as whole-file duplicates
    pub num_file_dupes: usize,
    /// Block sightings after the first, same-file ones included
    pub num_block_dupes: usize,
    /// Block sightings whose first occurrence was in the same file
    pub num_block_dupes_in_same_file: usize,
}

impl RunState {
    /// Zeroed counters with the corpus totals filled in.
    #[must_use]
    pub fn for_corpus(documents: &[Document]) -> Self {
        Self {
            total_files: documents.len(),
            total_lines: documents.iter().map(|d| d.lines).sum(),
            ..Default::default()
        }
    }
}

/// Records and counters from a classification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Records in creation order
    pub records: Vec<DuplicateRecord>,
    /// Final counters
    pub state: RunState,
}

/// Classify a corpus with fresh run state.
#[must_use]
pub fn classify(documents: &[Document], filter: BlockFilter) -> Classification {
    let mut state = RunState::for_corpus(documents);
    let records = Classifier::new(filter).classify(documents, &mut state);
    Classification { records, state }
}

/// First document seen with a given fingerprint.
#[derive(Debug, Clone, Copy)]
struct DocumentEntry {
    /// Position in the input slice
    position: usize,
    /// Whole-file record, once a duplicate has been seen
    record: Option<usize>,
}

/// Run-scoped lookup tables and the records they point into.
///
/// A classifier is consumed by [`Classifier::classify`], so its tables can
/// never leak from one run into the next.
pub struct Classifier {
    filter: BlockFilter,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
    documents: HashMap<Fingerprint, DocumentEntry>,
    block_origin: HashMap<Fingerprint, Fingerprint>,
    records: Vec<DuplicateRecord>,
    /// Input positions of each record's participants
    members: Vec<Vec<usize>>,
    by_block: HashMap<Fingerprint, usize>,
    by_pair: HashMap<(usize, usize), usize>,
    same_file: HashMap<usize, usize>,
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("filter", &self.filter)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .field("documents", &self.documents.len())
            .field("records", &self.records.len())
            .finish()
    }
}

impl Classifier {
    /// Create a classifier with empty tables.
    #[must_use]
    pub fn new(filter: BlockFilter) -> Self {
        Self {
            filter,
            progress_callback: None,
            documents: HashMap::new(),
            block_origin: HashMap::new(),
            records: Vec::new(),
            members: Vec::new(),
            by_block: HashMap::new(),
            by_pair: HashMap::new(),
            same_file: HashMap::new(),
        }
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Classify `documents` in order, updating `state`.
    ///
    /// `state` should come from [`RunState::for_corpus`]; only the duplicate
    /// counters are touched here.
    pub fn classify(
        mut self,
        documents: &[Document],
        state: &mut RunState,
    ) -> Vec<DuplicateRecord> {
        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("classify", documents.len());
        }
        log::info!("Classifying {} documents", documents.len());

        for (position, document) in documents.iter().enumerate() {
            if let Some(ref callback) = self.progress_callback {
                callback.on_progress(position + 1, &document.path.to_string_lossy());
            }
            self.classify_document(documents, position, state);
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("classify");
        }
        log::debug!(
            "Classification produced {} records ({} duplicate files, {} duplicate blocks)",
            self.records.len(),
            state.num_file_dupes,
            state.num_block_dupes
        );
        self.records
    }

    fn classify_document(
        &mut self,
        documents: &[Document],
        position: usize,
        state: &mut RunState,
    ) {
        let document = &documents[position];
        let document_fp = fingerprint(&minify(&document.content));

        if let Some(entry) = self.documents.get(&document_fp).copied() {
            self.record_whole_file(documents, entry, position, document_fp);
            state.num_file_dupes += 1;
            state.duped_lines += document.lines;
            return;
        }

        self.documents.insert(
            document_fp,
            DocumentEntry {
                position,
                record: None,
            },
        );

        for block in segment(&document.content) {
            if !self.filter.qualifies(block.text) {
                continue;
            }
            let block_fp = fingerprint(&block.key);

            let Some(origin_fp) = self.block_origin.get(&block_fp).copied() else {
                self.block_origin.insert(block_fp, document_fp);
                continue;
            };
            let Some(origin) = self.documents.get(&origin_fp).map(|e| e.position) else {
                // Origins are registered before their blocks; nothing to match against.
                log::warn!("Block {} has no origin document", block_fp.short());
                continue;
            };

            if origin == position {
                self.record_same_file(document, position, block.text, block_fp);
                state.num_block_dupes_in_same_file += 1;
            } else {
                self.record_cross_file(documents, origin, position, block.text, block_fp);
            }
            state.num_block_dupes += 1;
            state.duped_lines += block.lines();
        }
    }

    fn record_whole_file(
        &mut self,
        documents: &[Document],
        entry: DocumentEntry,
        position: usize,
        document_fp: Fingerprint,
    ) {
        let current = &documents[position];
        match entry.record {
            Some(index) => {
                self.records[index].add_path(&current.path);
            }
            None => {
                let first = &documents[entry.position];
                log::trace!(
                    "Whole-file duplicate: {} matches {}",
                    current.path.display(),
                    first.path.display()
                );
                let index = self.push_record(
                    DuplicateRecord::whole_file(&first.path, &current.path, document_fp),
                    vec![entry.position, position],
                );
                if let Some(slot) = self.documents.get_mut(&document_fp) {
                    slot.record = Some(index);
                }
            }
        }
    }

    fn record_same_file(
        &mut self,
        document: &Document,
        position: usize,
        text: &str,
        block_fp: Fingerprint,
    ) {
        log::trace!(
            "Same-file block {} in {}",
            block_fp.short(),
            document.path.display()
        );
        match self.same_file.get(&position) {
            Some(&index) => {
                self.records[index].add_block(text, block_fp);
            }
            None => {
                let index = self.push_record(
                    DuplicateRecord::same_file(&document.path, text, block_fp),
                    vec![position],
                );
                self.same_file.insert(position, index);
            }
        }
    }

    fn record_cross_file(
        &mut self,
        documents: &[Document],
        origin: usize,
        position: usize,
        text: &str,
        block_fp: Fingerprint,
    ) {
        log::trace!(
            "Cross-file block {}: {} also in {}",
            block_fp.short(),
            documents[position].path.display(),
            documents[origin].path.display()
        );

        if let Some(&index) = self.by_block.get(&block_fp) {
            self.add_member(documents, index, position);
            return;
        }

        if let Some(&index) = self.by_pair.get(&pair(origin, position)) {
            self.records[index].add_block(text, block_fp);
            self.by_block.insert(block_fp, index);
            return;
        }

        let record = DuplicateRecord::cross_file(
            &documents[origin].path,
            &documents[position].path,
            text,
            block_fp,
        );
        let index = self.push_record(record, vec![origin, position]);
        self.by_block.insert(block_fp, index);
        self.by_pair.entry(pair(origin, position)).or_insert(index);
    }

    /// Add a participant to a cross-file record and index the new pairs it forms.
    fn add_member(&mut self, documents: &[Document], index: usize, position: usize) {
        if self.members[index].contains(&position) {
            return;
        }
        self.records[index].add_path(&documents[position].path);
        for &other in &self.members[index] {
            self.by_pair.entry(pair(other, position)).or_insert(index);
        }
        self.members[index].push(position);
    }

    fn push_record(&mut self, record: DuplicateRecord, members: Vec<usize>) -> usize {
        self.records.push(record);
        self.members.push(members);
        self.records.len() - 1
    }
}

/// Unordered key for a pair of documents.
fn pair(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
