//! Scanner module for document discovery, loading and segmentation.
//!
//! This module provides functionality for:
//! - Parallel directory walking using jwalk
//! - All-or-nothing document loading on a bounded rayon pool
//! - Blank-line segmentation and whitespace canonicalization
//! - Content fingerprinting with BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`loader`]: Reads discovered files into [`Document`]s
//! - [`segment`]: Block segmentation, canonical keys and the size filter
//! - [`hasher`]: BLAKE3 fingerprints of canonical text
//!
//! # Example
//!
//! ```no_run
//! use paradupe::scanner::{load_documents, LoaderConfig, Walker, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let walker = Walker::new(vec![PathBuf::from(".")], WalkerConfig::default());
//! let paths = walker.collect_paths().unwrap();
//! let documents = load_documents(paths, &LoaderConfig::default()).unwrap();
//! println!("Loaded {} documents", documents.len());
//! ```

pub mod hasher;
pub mod loader;
pub mod segment;
pub mod walker;

use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{fingerprint, Fingerprint};
pub use loader::{load_documents, LoaderConfig};
pub use segment::{count_lines, minify, normalize, segment, Block, BlockFilter};
pub use walker::Walker;

/// One input file, fully materialized in memory.
///
/// Documents are immutable once loaded. The newline count is computed once
/// so that both the run totals and whole-file duplicate accounting read the
/// same number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Text content of the file
    pub content: String,
    /// Path the content was read from
    pub path: PathBuf,
    /// Position in discovery order
    pub index: usize,
    /// Number of newline characters in `content`
    pub lines: usize,
}

impl Document {
    /// Create a new document, counting its lines.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the source file
    /// * `content` - Full text content
    /// * `index` - Position in discovery order
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, index: usize) -> Self {
        let content = content.into();
        let lines = count_lines(&content);
        Self {
            content,
            path: path.into(),
            index,
            lines,
        }
    }

    /// Path of this document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Configuration for directory walking.
///
/// Controls filtering, symlink handling, and other walk behavior.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Warning: May cause infinite loops with symlink cycles.
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Glob patterns a file must match to be included.
    /// Empty means every file is included.
    pub patterns: Vec<String>,

    /// Glob patterns to ignore (gitignore-style).
    /// These are applied in addition to any .gitignore files.
    pub ignore_patterns: Vec<String>,
}

impl WalkerConfig {
    /// Create a new configuration from resolved settings.
    ///
    /// # Arguments
    ///
    /// * `follow_symlinks` - Whether to follow symbolic links
    /// * `skip_hidden` - Whether to skip hidden files
    /// * `patterns` - Include globs
    /// * `ignore_patterns` - Glob patterns to ignore
    #[must_use]
    pub fn new(
        follow_symlinks: bool,
        skip_hidden: bool,
        patterns: Vec<String>,
        ignore_patterns: Vec<String>,
    ) -> Self {
        Self {
            follow_symlinks,
            skip_hidden,
            patterns,
            ignore_patterns,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An include pattern could not be compiled.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending glob
        pattern: String,
        /// Parser message
        message: String,
    },

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort document loading.
///
/// Any of these stops the run before classification begins; the classifier
/// never sees a partial corpus.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path of the unreadable file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The worker pool could not be created.
    #[error("Failed to start loader pool: {0}")]
    Pool(String),

    /// Loading was interrupted by a shutdown request.
    #[error("Loading interrupted")]
    Interrupted,
}
