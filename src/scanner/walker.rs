//! File discovery using jwalk for parallel traversal.
//!
//! # Overview
//!
//! The [`Walker`] turns a list of roots into the ordered list of files the
//! loader reads. Each root may be a directory (walked recursively) or a
//! single file (taken as-is).
//!
//! # Features
//!
//! - Parallel directory traversal with deterministic, sorted output
//! - Gitignore-style excludes via the `ignore` crate, plus the root `.gitignore`
//! - Include globs (`**/*.md`) via `ignore` overrides
//! - Hidden file and symlink filtering
//! - Each path is yielded at most once, even with overlapping roots
//!
//! # Example
//!
//! ```no_run
//! use paradupe::scanner::{Walker, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let config = WalkerConfig {
//!     patterns: vec!["**/*.md".to_string()],
//!     skip_hidden: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(vec![PathBuf::from("docs")], config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::overrides::{Override, OverrideBuilder};
use jwalk::WalkDir;

use super::{ScanError, WalkerConfig};
use crate::progress::ProgressCallback;

type PathIter<'a> = Box<dyn Iterator<Item = Result<PathBuf, ScanError>> + 'a>;

/// Directory walker for file discovery.
pub struct Walker {
    /// Roots to walk, in the order given
    roots: Vec<PathBuf>,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("roots", &self.roots)
            .field("config", &self.config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Walker {
    /// Create a new walker over the given roots.
    ///
    /// # Arguments
    ///
    /// * `roots` - Directories or files to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, config: WalkerConfig) -> Self {
        Self {
            roots,
            config,
            shutdown_flag: None,
            progress_callback: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
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

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Build gitignore matcher from config patterns and the root .gitignore.
    fn build_gitignore(&self, root: &Path) -> Option<Gitignore> {
        let mut builder = GitignoreBuilder::new(root);

        let gitignore_path = root.join(".gitignore");
        if gitignore_path.exists() {
            if let Some(e) = builder.add(&gitignore_path) {
                log::warn!(
                    "Failed to load .gitignore from {}: {}",
                    gitignore_path.display(),
                    e
                );
            } else {
                log::debug!("Loaded .gitignore from {}", gitignore_path.display());
            }
        }

        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if !gitignore.is_empty() => Some(gitignore),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    /// Build the include matcher. `None` means every file is included.
    fn build_overrides(&self, root: &Path) -> Result<Option<Override>, ScanError> {
        if self.config.patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = OverrideBuilder::new(root);
        for pattern in &self.config.patterns {
            builder
                .add(pattern)
                .map_err(|e| ScanError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
        }
        builder
            .build()
            .map(Some)
            .map_err(|e| ScanError::InvalidPattern {
                pattern: self.config.patterns.join(", "),
                message: e.to_string(),
            })
    }

    /// Check a file against ignore patterns and include globs.
    fn is_selected(
        &self,
        root: &Path,
        path: &Path,
        gitignore: &Option<Gitignore>,
        overrides: &Option<Override>,
    ) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);

        if let Some(gi) = gitignore {
            if gi.matched_path_or_any_parents(relative, false).is_ignore() {
                log::trace!("Ignoring file: {}", path.display());
                return false;
            }
        }

        if let Some(ov) = overrides {
            if !ov.matched(relative, false).is_whitelist() {
                log::trace!("Not matched by any pattern: {}", path.display());
                return false;
            }
        }

        true
    }

    /// Walk every root, yielding file paths in deterministic order.
    ///
    /// Errors are yielded rather than stopping iteration; see
    /// [`Walker::collect_paths`] for which of them are fatal.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        let mut seen = HashSet::new();
        self.roots
            .iter()
            .flat_map(move |root| self.walk_root(root))
            .filter(move |entry| match entry {
                Ok(path) => seen.insert(path.clone()),
                Err(_) => true,
            })
    }

    fn walk_root<'a>(&'a self, root: &'a Path) -> PathIter<'a> {
        if !root.exists() {
            return Box::new(std::iter::once(Err(ScanError::NotFound(root.to_path_buf()))));
        }
        if root.is_file() {
            return Box::new(std::iter::once(Ok(root.to_path_buf())));
        }

        let gitignore = self.build_gitignore(root);
        let overrides = match self.build_overrides(root) {
            Ok(overrides) => overrides,
            Err(e) => return Box::new(std::iter::once(Err(e))),
        };

        let walk_dir = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .skip_hidden(self.config.skip_hidden)
            .process_read_dir(|_depth, _path, _read_dir_state, children| {
                // Sort children for deterministic output
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });

        Box::new(walk_dir.into_iter().filter_map(move |entry_result| {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                return None;
            }

            match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        return None;
                    }
                    if file_type.is_symlink() && !self.config.follow_symlinks {
                        log::trace!("Skipping symlink: {}", entry.path().display());
                        return None;
                    }

                    let path = entry.path();
                    if !path.is_file() {
                        return None;
                    }
                    if !self.is_selected(root, &path, &gitignore, &overrides) {
                        return None;
                    }
                    Some(Ok(path))
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| root.to_path_buf(), std::borrow::ToOwned::to_owned);
                    log::warn!("Walker error for {}: {}", path.display(), e);
                    let denied = e
                        .io_error()
                        .is_some_and(|io| io.kind() == std::io::ErrorKind::PermissionDenied);
                    if denied {
                        return Some(Err(ScanError::PermissionDenied(path)));
                    }
                    Some(Err(ScanError::Io {
                        path,
                        source: std::io::Error::other(e.to_string()),
                    }))
                }
            }
        }))
    }

    /// Collect every discovered path.
    ///
    /// A missing root or a bad include pattern aborts discovery. Unreadable
    /// directories below a root are logged and skipped, as they contribute
    /// no documents.
    ///
    /// # Errors
    ///
    /// Returns the first [`ScanError::NotFound`] or [`ScanError::InvalidPattern`].
    pub fn collect_paths(&self) -> Result<Vec<PathBuf>, ScanError> {
        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("walk", 0);
        }

        let mut paths = Vec::new();
        for entry in self.walk() {
            match entry {
                Ok(path) => {
                    if let Some(ref callback) = self.progress_callback {
                        callback.on_progress(paths.len() + 1, &path.to_string_lossy());
                    }
                    paths.push(path);
                }
                Err(e @ (ScanError::NotFound(_) | ScanError::InvalidPattern { .. })) => {
                    return Err(e);
                }
                Err(e) => log::warn!("Skipping unreadable entry: {}", e),
            }
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("walk");
        }
        log::info!("Discovered {} files", paths.len());
        Ok(paths)
    }
}
