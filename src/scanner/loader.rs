//! All-or-nothing document loading.
//!
//! # Overview
//!
//! Classification needs the whole corpus in memory before it starts, because
//! "first occurrence" is only meaningful with global visibility. Loading is
//! the one parallel stage: files are read on a bounded rayon pool, results
//! are put back in discovery order, and the first failure aborts the load.
//!
//! # Performance
//!
//! - The pool size defaults to 4 to avoid thrashing spinning disks
//! - Content is decoded as UTF-8; invalid sequences are replaced, not rejected

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::{Document, LoadError};
use crate::progress::ProgressCallback;

/// Configuration for the load phase.
#[derive(Clone)]
pub struct LoaderConfig {
    /// Number of reader threads.
    pub io_threads: usize,
    /// Optional shutdown flag for aborting the load.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for LoaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderConfig")
            .field("io_threads", &self.io_threads)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl LoaderConfig {
    /// Set the reader thread count (at least 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the shutdown flag.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Read every path into a [`Document`].
///
/// Documents are indexed in the order of `paths`, whichever thread read them.
///
/// # Errors
///
/// - [`LoadError::Read`] for the first file that could not be read
/// - [`LoadError::Interrupted`] if the shutdown flag was raised
/// - [`LoadError::Pool`] if the reader pool could not be built
pub fn load_documents(
    paths: Vec<PathBuf>,
    config: &LoaderConfig,
) -> Result<Vec<Document>, LoadError> {
    if config.is_shutdown_requested() {
        return Err(LoadError::Interrupted);
    }
    if paths.is_empty() {
        log::debug!("Load: No files to read");
        return Ok(Vec::new());
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start("load", paths.len());
    }
    log::info!(
        "Loading {} documents with {} threads",
        paths.len(),
        config.io_threads
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.io_threads.max(1))
        .build()
        .map_err(|e| LoadError::Pool(e.to_string()))?;

    let loaded = AtomicUsize::new(0);
    let result: Result<Vec<Document>, LoadError> = pool.install(|| {
        paths
            .into_par_iter()
            .enumerate()
            .map(|(index, path)| {
                if config.is_shutdown_requested() {
                    return Err(LoadError::Interrupted);
                }
                let content = read_text(&path)?;
                let current = loaded.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(ref callback) = config.progress_callback {
                    callback.on_progress(current, &path.to_string_lossy());
                }
                Ok(Document::new(path, content, index))
            })
            .collect()
    });

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end("load");
    }

    // A read error racing the interrupt is still an interrupted run.
    if config.is_shutdown_requested() {
        return Err(LoadError::Interrupted);
    }

    let documents = result?;
    log::debug!(
        "Loaded {} documents, {} lines",
        documents.len(),
        documents.iter().map(|d| d.lines).sum::<usize>()
    );
    Ok(documents)
}

fn read_text(path: &Path) -> Result<String, LoadError> {
    let bytes = fs::read(path).map_err(|source| {
        log::error!("Failed to read {}: {}", path.display(), source);
        LoadError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_preserves_order_and_counts_lines() {
        let dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..20)
            .map(|i| write(&dir, &format!("f{i:02}.txt"), &"line\n".repeat(i)))
            .collect();

        let docs = load_documents(paths.clone(), &LoaderConfig::default()).unwrap();

        assert_eq!(docs.len(), 20);
        for (i, doc) in docs.iter().enumerate() {
            assert_eq!(doc.index, i);
            assert_eq!(doc.path, paths[i]);
            assert_eq!(doc.lines, i);
        }
    }

    #[test]
    fn test_load_empty_list() {
        let docs = load_documents(Vec::new(), &LoaderConfig::default()).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_load_fails_on_any_missing_file() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "good.txt", "ok\n");
        let missing = dir.path().join("missing.txt");

        let result = load_documents(vec![good, missing.clone()], &LoaderConfig::default());
        match result {
            Err(LoadError::Read { path, .. }) => assert_eq!(path, missing),
            other => panic!("Expected Read error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_lossy_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bin.dat");
        fs::write(&path, [b'a', 0xff, b'\n']).unwrap();

        let docs = load_documents(vec![path], &LoaderConfig::default()).unwrap();
        assert_eq!(docs[0].content, "a\u{fffd}\n");
        assert_eq!(docs[0].lines, 1);
    }

    #[test]
    fn test_load_interrupted() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.txt", "a\n");
        let config = LoaderConfig::default().with_shutdown_flag(Arc::new(AtomicBool::new(true)));

        assert!(matches!(
            load_documents(vec![path], &config),
            Err(LoadError::Interrupted)
        ));
    }

    #[test]
    fn test_with_io_threads_minimum() {
        assert_eq!(LoaderConfig::default().with_io_threads(0).io_threads, 1);
        assert_eq!(LoaderConfig::default().with_io_threads(8).io_threads, 8);
    }
}
