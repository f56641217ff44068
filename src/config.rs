//! Application configuration management.
//!
//! Scan defaults can be stored in a JSON file so they need not be repeated
//! on every invocation. Command-line flags always win over file values.
//!
//! ```json
//! {
//!   "method": "name",
//!   "algorithm": "blake3",
//!   "io_threads": 4,
//!   "skip_hidden": true,
//!   "ignore_patterns": ["*.tmp"]
//! }
//! ```

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::duplicates::{FinderConfig, ScanMode};
use crate::scanner::{HashAlgorithm, WalkerConfig};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default detection method.
    pub method: ScanMode,
    /// Default digest for the hash method.
    pub algorithm: HashAlgorithm,
    /// Default number of hashing threads.
    pub io_threads: usize,
    /// Skip hidden entries by default.
    pub skip_hidden: bool,
    /// Follow symbolic links by default.
    pub follow_symlinks: bool,
    /// Patterns always ignored, in addition to any `--ignore` flags.
    pub ignore_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            method: ScanMode::Content,
            algorithm: HashAlgorithm::Md5,
            io_threads: 1,
            skip_hidden: false,
            follow_symlinks: false,
            ignore_patterns: Vec::new(),
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// A missing or unreadable file yields the defaults.
    pub fn load() -> Self {
        match Self::config_path().and_then(|path| Self::load_optional(&path)) {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load the configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn load_optional(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Resolve the config for a CLI invocation: defaults under
    /// `--no-config`, `--config` if given, otherwise the default path.
    ///
    /// # Errors
    ///
    /// Fails only when an explicit `--config` file cannot be loaded.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        if cli.no_config {
            log::debug!("Config file disabled by --no-config");
            return Ok(Self::default());
        }
        match cli.config {
            Some(ref path) => Self::load_from(path),
            None => Ok(Self::load()),
        }
    }

    /// The detection method, with the CLI flag taking precedence.
    #[must_use]
    pub fn scan_mode(&self, cli: &Cli) -> ScanMode {
        cli.method.unwrap_or(self.method)
    }

    /// Build the finder configuration, with CLI flags taking precedence.
    #[must_use]
    pub fn finder_config(&self, cli: &Cli) -> FinderConfig {
        let mut ignore_patterns = self.ignore_patterns.clone();
        ignore_patterns.extend(cli.ignore_patterns.iter().cloned());

        let walker_config = WalkerConfig::default()
            .with_follow_symlinks(cli.follow_symlinks || self.follow_symlinks)
            .with_skip_hidden(cli.skip_hidden || self.skip_hidden)
            .with_ignore_patterns(ignore_patterns)
            .with_max_depth(cli.max_depth);

        FinderConfig::default()
            .with_algorithm(cli.algorithm.unwrap_or(self.algorithm))
            .with_io_threads(cli.io_threads.map_or(self.io_threads, usize::from))
            .with_strict(cli.strict)
            .with_walker_config(walker_config)
    }

    /// Get the default platform-specific configuration path.
    fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "dupescan", "dupescan")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.json"))
    }
}
