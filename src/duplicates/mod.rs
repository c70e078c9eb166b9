//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Single-pass classification of whole-file and block duplicates
//! - Consolidated duplicate records
//! - The uniqueness score and pass/fail verdict

pub mod classifier;
pub mod records;
pub mod score;

pub use classifier::{classify, Classification, Classifier, RunState};
pub use records::{sort_for_report, DuplicateRecord, RecordKind};
pub use score::{uniqueness_score, Verdict};
