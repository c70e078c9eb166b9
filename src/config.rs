//! Layered configuration.
//!
//! Settings are merged with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. User config: `config.toml` in the platform config directory
//! 3. Project config: `.paradupe.toml` or the legacy JSON `.trc` in the
//!    working directory (an explicit `--config` file replaces both)
//! 4. Environment: `PARADUPE_*` variables
//! 5. Command-line flags, applied with [`Config::apply`]
//!
//! Missing fields fall back to the defaults silently. Unknown keys are
//! logged with a suggestion for the closest known key.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::scanner::{BlockFilter, WalkerConfig};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "PARADUPE_";

/// Project config file name.
pub const PROJECT_FILE: &str = ".paradupe.toml";

/// Legacy JSON project config file name.
pub const LEGACY_FILE: &str = ".trc";

/// Keys accepted in config files.
const KNOWN_KEYS: &[&str] = &[
    "min_lines",
    "min_chars",
    "failure_threshold",
    "ignore",
    "patterns",
    "io_threads",
    "follow_symlinks",
    "skip_hidden",
];

/// camelCase spellings used by `.trc` files.
const LEGACY_KEYS: &[(&str, &str)] = &[
    ("minLines", "min_lines"),
    ("minChars", "min_chars"),
    ("failureThreshold", "failure_threshold"),
    ("ioThreads", "io_threads"),
    ("followSymlinks", "follow_symlinks"),
    ("skipHidden", "skip_hidden"),
];

/// Errors raised while loading or validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A config source could not be read or had values of the wrong type.
    #[error("Invalid configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A JSON config file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// The config file
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// A JSON config file is not a valid JSON object.
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        /// The config file
        path: PathBuf,
        /// The underlying error
        #[source]
        source: serde_json::Error,
    },

    /// The failure threshold is not a percentage.
    #[error("failure_threshold must be between 0 and 100, got {0}")]
    InvalidThreshold(f64),

    /// Zero reader threads were requested.
    #[error("io_threads must be at least 1")]
    InvalidIoThreads,
}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Newline characters a block needs before it is matched
    pub min_lines: usize,
    /// A block must be longer than this many characters to be matched
    pub min_chars: usize,
    /// Minimum passing uniqueness score, in percent
    pub failure_threshold: f64,
    /// Gitignore-style patterns excluded from the scan
    pub ignore: Vec<String>,
    /// Include globs; empty scans every file
    pub patterns: Vec<String>,
    /// Reader threads for loading documents
    pub io_threads: usize,
    /// Follow symbolic links while walking
    pub follow_symlinks: bool,
    /// Skip hidden files and directories
    pub skip_hidden: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_lines: 2,
            min_chars: 20,
            failure_threshold: 95.0,
            ignore: vec![
                "node_modules/".to_string(),
                ".git/".to_string(),
                "target/".to_string(),
            ],
            patterns: Vec::new(),
            io_threads: 4,
            follow_symlinks: false,
            skip_hidden: true,
        }
    }
}

/// Values supplied on the command line.
///
/// `None` and empty lists leave the file/env value untouched. Ignore
/// patterns are appended; include patterns replace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    /// `--min-lines`
    pub min_lines: Option<usize>,
    /// `--min-chars`
    pub min_chars: Option<usize>,
    /// `--threshold`
    pub failure_threshold: Option<f64>,
    /// `--ignore`
    pub ignore: Vec<String>,
    /// `--pattern`
    pub patterns: Vec<String>,
    /// `--io-threads`
    pub io_threads: Option<usize>,
    /// `--follow-symlinks`
    pub follow_symlinks: bool,
    /// `--hidden`
    pub include_hidden: bool,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// # Errors
    ///
    /// See [`Config::load_from_sources`].
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::load_from_sources(Self::user_config_path().as_deref(), &cwd, explicit)
    }

    /// Load configuration from the given sources.
    ///
    /// # Arguments
    ///
    /// * `user` - User-level TOML file, if any
    /// * `project_dir` - Directory searched for `.paradupe.toml` and `.trc`
    /// * `explicit` - File given with `--config`; replaces the project files
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotFound`] if `explicit` does not exist
    /// - [`ConfigError::Load`] if a file is malformed or a value has the wrong type
    pub fn load_from_sources(
        user: Option<&Path>,
        project_dir: &Path,
        explicit: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut files: Vec<PathBuf> = Vec::new();
        if let Some(user) = user {
            files.push(user.to_path_buf());
        }
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                files.push(path.to_path_buf());
            }
            None => {
                files.push(project_dir.join(PROJECT_FILE));
                files.push(project_dir.join(LEGACY_FILE));
            }
        }

        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        for file in files.iter().filter(|f| f.is_file()) {
            log::debug!("Reading config from {}", file.display());
            let provider = file_provider(file)?;
            warn_unknown_keys(file, &provider);
            figment = figment.merge(provider);
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        figment.extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Get the default platform-specific user configuration path.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "paradupe", "paradupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line overrides.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(min_lines) = overrides.min_lines {
            self.min_lines = min_lines;
        }
        if let Some(min_chars) = overrides.min_chars {
            self.min_chars = min_chars;
        }
        if let Some(threshold) = overrides.failure_threshold {
            self.failure_threshold = threshold;
        }
        if let Some(io_threads) = overrides.io_threads {
            self.io_threads = io_threads;
        }
        self.ignore.extend(overrides.ignore.iter().cloned());
        if !overrides.patterns.is_empty() {
            self.patterns = overrides.patterns.clone();
        }
        self.follow_symlinks |= overrides.follow_symlinks;
        if overrides.include_hidden {
            self.skip_hidden = false;
        }
    }

    /// Check values that deserialize fine but make no sense.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.failure_threshold) {
            return Err(ConfigError::InvalidThreshold(self.failure_threshold));
        }
        if self.io_threads == 0 {
            return Err(ConfigError::InvalidIoThreads);
        }
        Ok(())
    }

    /// Block size filter for the classifier.
    #[must_use]
    pub fn block_filter(&self) -> BlockFilter {
        BlockFilter::new(self.min_lines, self.min_chars)
    }

    /// Walker settings for discovery.
    ///
    /// Project config files are never scanned, even with hidden files enabled.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        let mut ignore = self.ignore.clone();
        ignore.extend([PROJECT_FILE.to_string(), LEGACY_FILE.to_string()]);
        WalkerConfig::new(
            self.follow_symlinks,
            self.skip_hidden,
            self.patterns.clone(),
            ignore,
        )
    }
}

/// JSON for `.trc` and `*.json`, TOML otherwise.
fn file_provider(path: &Path) -> Result<Figment, ConfigError> {
    let is_json = path.file_name().is_some_and(|n| n == LEGACY_FILE)
        || path.extension().is_some_and(|e| e == "json");
    if !is_json {
        return Ok(Figment::from(Toml::file(path)));
    }

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let object: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    let normalized: serde_json::Map<String, serde_json::Value> = object
        .into_iter()
        .map(|(key, value)| (normalize_key(&key).to_string(), value))
        .collect();
    Ok(Figment::from(Serialized::defaults(normalized)))
}

/// Map a legacy camelCase key to its snake_case name.
fn normalize_key(key: &str) -> &str {
    LEGACY_KEYS
        .iter()
        .find(|(legacy, _)| *legacy == key)
        .map_or(key, |(_, known)| *known)
}

fn warn_unknown_keys(path: &Path, provider: &Figment) {
    let Ok(keys) = provider.extract::<BTreeMap<String, figment::value::Value>>() else {
        return;
    };
    for key in keys.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        match suggest_key(key) {
            Some(known) => log::warn!(
                "Unknown config key '{}' in {} (did you mean '{}'?)",
                key,
                path.display(),
                known
            ),
            None => log::warn!("Unknown config key '{}' in {}", key, path.display()),
        }
    }
}

/// Closest known key to `key`, if any is reasonably close.
#[must_use]
pub fn suggest_key(key: &str) -> Option<&'static str> {
    KNOWN_KEYS
        .iter()
        .map(|known| (*known, strsim::jaro_winkler(key, known)))
        .filter(|(_, score)| *score > 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(known, _)| known)
}
