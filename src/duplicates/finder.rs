//! Duplicate finder: traversal, keying and aggregation for one scan.
//!
//! # Overview
//!
//! A [`DuplicateFinder`] is bound to a validated [`ScanRoot`]. Each call to
//! [`DuplicateFinder::find_duplicates`] walks the tree from scratch, keys
//! every file according to the [`ScanMode`] and returns the groups with two
//! or more members together with a [`ScanSummary`].
//!
//! - **Content mode** keys a file by the hex digest of its bytes.
//! - **Name mode** keys a file by its base filename and never opens it.
//!
//! Files that cannot be read are left out of the groups and recorded in
//! [`ScanSummary::errors`]. With [`FinderConfig::strict`] the first such
//! error aborts the scan instead.
//!
//! # Parallel hashing
//!
//! With `io_threads > 1` the walk is collected first and files are hashed on
//! a dedicated rayon pool. Results come back in walk order and are grouped
//! on the calling thread, so the groups are identical to a sequential scan.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::DuplicateFinder;
//!
//! let finder = DuplicateFinder::open("/some/path").unwrap();
//! let (groups, summary) = finder.find_duplicates_by_content().unwrap();
//!
//! for group in &groups {
//!     println!("{}: {} files", group.display_key(), group.len());
//! }
//! println!("{} files scanned", summary.total_files);
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::groups::{name_key, DuplicateGroups, GroupAccumulator};
use crate::progress::{ProgressCallback, PHASE_HASHING, PHASE_WALKING};
use crate::scanner::{FileEntry, HashAlgorithm, HashError, Hasher, ScanError, Walker, WalkerConfig};

/// Detection strategy.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum ScanMode {
    /// Group by content digest
    #[default]
    #[value(name = "hash")]
    #[serde(rename = "hash")]
    Content,
    /// Group by base filename
    #[value(name = "name")]
    #[serde(rename = "name")]
    Name,
}

impl ScanMode {
    /// Title-case label used in report headers.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Content => "Hash",
            Self::Name => "Name",
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content => write!(f, "hash"),
            Self::Name => write!(f, "name"),
        }
    }
}

/// A directory that existed when the scan was set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRoot {
    path: PathBuf,
}

impl ScanRoot {
    /// Validate that `path` exists and is a directory.
    ///
    /// The path is kept as given, so reported file paths are the root
    /// joined with each file's location below it.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::PathNotFound`] if nothing exists at `path`,
    /// [`FinderError::NotADirectory`] if it is not a directory, or
    /// [`FinderError::IoWithPath`] if it cannot be inspected.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, FinderError> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FinderError::PathNotFound(path.to_path_buf()),
            _ => FinderError::IoWithPath {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        if !metadata.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// The validated directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for ScanRoot {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Digest used in content mode.
    pub algorithm: HashAlgorithm,
    /// Number of hashing threads. 1 hashes each file as it is discovered.
    pub io_threads: usize,
    /// Fail on the first per-file error instead of recording it.
    pub strict: bool,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinderConfig")
            .field("algorithm", &self.algorithm)
            .field("io_threads", &self.io_threads)
            .field("strict", &self.strict)
            .field("walker_config", &self.walker_config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            io_threads: 1,
            strict: false,
            walker_config: WalkerConfig::default(),
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Select the content digest.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the number of hashing threads (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set fail-fast on any per-file error.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Total number of regular files discovered
    pub total_files: usize,
    /// Total size of all discovered files in bytes
    pub total_size: u64,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Members beyond the first of each group
    pub duplicate_files: usize,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Per-entry errors encountered during the scan
    pub errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Whether any file or directory could not be processed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        bytesize::ByteSize(self.total_size).to_string()
    }

    fn record_file(&mut self, file: &FileEntry) {
        self.total_files += 1;
        self.total_size += file.size;
    }
}

/// Errors that abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Directory not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path exists but is not a directory.
    #[error("Directory not found: {0}")]
    NotADirectory(PathBuf),

    /// The provided path could not be inspected.
    #[error("I/O error for {path}: {source}")]
    IoWithPath {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The hashing thread pool could not be created.
    #[error("Failed to build hashing thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A per-file error in strict mode.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl FinderError {
    /// Whether this error means the scan root itself was unusable.
    #[must_use]
    pub fn is_invalid_root(&self) -> bool {
        matches!(
            self,
            Self::PathNotFound(_) | Self::NotADirectory(_) | Self::IoWithPath { .. }
        )
    }
}

/// Duplicate finder bound to one scan root.
pub struct DuplicateFinder {
    root: ScanRoot,
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a finder for a validated root.
    #[must_use]
    pub fn new(root: ScanRoot, config: FinderConfig) -> Self {
        let hasher = Hasher::new().with_algorithm(config.algorithm);
        Self {
            root,
            config,
            hasher,
        }
    }

    /// Validate `path` and create a finder with default configuration.
    ///
    /// # Errors
    ///
    /// Fails if `path` is missing or not a directory; see [`ScanRoot::new`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FinderError> {
        Ok(Self::new(ScanRoot::new(path)?, FinderConfig::default()))
    }

    /// The directory this finder scans.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Group files by content digest.
    ///
    /// # Errors
    ///
    /// Only in strict mode, on the first unreadable entry.
    pub fn find_duplicates_by_content(
        &self,
    ) -> Result<(DuplicateGroups, ScanSummary), FinderError> {
        self.find_duplicates(ScanMode::Content)
    }

    /// Group files by base filename.
    ///
    /// # Errors
    ///
    /// Only in strict mode, on the first traversal error.
    pub fn find_duplicates_by_name(&self) -> Result<(DuplicateGroups, ScanSummary), FinderError> {
        self.find_duplicates(ScanMode::Name)
    }

    /// Run a full scan in the given mode.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - strict mode is on and an entry could not be walked or hashed
    /// - the hashing thread pool could not be created
    pub fn find_duplicates(
        &self,
        mode: ScanMode,
    ) -> Result<(DuplicateGroups, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();
        let mut accumulator = GroupAccumulator::new();

        log::info!(
            "Starting duplicate scan (by {}) of {}",
            mode,
            self.root.path().display()
        );

        let walker = Walker::new(self.root.path(), self.config.walker_config.clone());

        match mode {
            ScanMode::Name => self.group_by_name(&walker, &mut accumulator, &mut summary)?,
            ScanMode::Content if self.config.io_threads > 1 => {
                self.group_by_content_parallel(&walker, &mut accumulator, &mut summary)?;
            }
            ScanMode::Content => {
                self.group_by_content(&walker, &mut accumulator, &mut summary)?;
            }
        }

        log::debug!(
            "{} distinct keys across {} files",
            accumulator.len(),
            accumulator.total_files()
        );

        let groups = accumulator.into_duplicates();
        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.duplicate_files();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} files ({}), {} duplicate groups, {} duplicate files, {} errors",
            summary.total_files,
            summary.total_size_display(),
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.errors.len()
        );

        Ok((groups, summary))
    }

    /// Key every walked file by its base name.
    fn group_by_name(
        &self,
        walker: &Walker,
        accumulator: &mut GroupAccumulator,
        summary: &mut ScanSummary,
    ) -> Result<(), FinderError> {
        self.phase_start(PHASE_WALKING, 0);

        for result in walker.walk() {
            match result {
                Ok(file) => {
                    summary.record_file(&file);
                    self.progress(summary.total_files, &file.path);
                    accumulator.insert(name_key(&file.path), file.path);
                }
                Err(e) => self.record_error(e, summary)?,
            }
        }

        self.phase_end(PHASE_WALKING);
        Ok(())
    }

    /// Hash each file as soon as the walker yields it.
    fn group_by_content(
        &self,
        walker: &Walker,
        accumulator: &mut GroupAccumulator,
        summary: &mut ScanSummary,
    ) -> Result<(), FinderError> {
        self.phase_start(PHASE_HASHING, 0);

        for result in walker.walk() {
            let file = match result {
                Ok(file) => file,
                Err(e) => {
                    self.record_error(e, summary)?;
                    continue;
                }
            };

            summary.record_file(&file);
            self.progress(summary.total_files, &file.path);
            let digest = self.hasher.hash_file(&file.path);
            self.record_digest(file.path, digest, accumulator, summary)?;
        }

        self.phase_end(PHASE_HASHING);
        Ok(())
    }

    /// Collect the walk, hash on a worker pool, then group in walk order.
    fn group_by_content_parallel(
        &self,
        walker: &Walker,
        accumulator: &mut GroupAccumulator,
        summary: &mut ScanSummary,
    ) -> Result<(), FinderError> {
        self.phase_start(PHASE_WALKING, 0);

        let mut files = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(file) => {
                    summary.record_file(&file);
                    self.progress(summary.total_files, &file.path);
                    files.push(file);
                }
                Err(e) => self.record_error(e, summary)?,
            }
        }

        self.phase_end(PHASE_WALKING);

        if files.is_empty() {
            return Ok(());
        }

        let announce = format!(
            "Hashing {} files on {} threads",
            files.len(),
            self.config.io_threads
        );
        log::debug!("{}", announce);
        self.phase_start(PHASE_HASHING, files.len());
        self.message(&announce);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .build()?;

        let hasher = self.hasher;
        let digests: Vec<(PathBuf, Result<String, HashError>)> = pool.install(|| {
            files
                .into_par_iter()
                .enumerate()
                .map(|(idx, file)| {
                    self.progress(idx + 1, &file.path);
                    let digest = hasher.hash_file(&file.path);
                    (file.path, digest)
                })
                .collect()
        });

        for (path, digest) in digests {
            self.record_digest(path, digest, accumulator, summary)?;
        }

        self.phase_end(PHASE_HASHING);
        Ok(())
    }

    fn record_digest(
        &self,
        path: PathBuf,
        digest: Result<String, HashError>,
        accumulator: &mut GroupAccumulator,
        summary: &mut ScanSummary,
    ) -> Result<(), FinderError> {
        match digest {
            Ok(digest) => {
                log::trace!("{} {}", digest, path.display());
                accumulator.insert(digest, path);
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to hash {}: {}", path.display(), e);
                self.record_error(ScanError::Hash(e), summary)
            }
        }
    }

    fn record_error(&self, error: ScanError, summary: &mut ScanSummary) -> Result<(), FinderError> {
        if self.config.strict {
            return Err(FinderError::Scan(error));
        }
        summary.errors.push(error);
        Ok(())
    }

    fn phase_start(&self, phase: &str, total: usize) {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(phase, total);
        }
    }

    fn progress(&self, current: usize, path: &Path) {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_progress(current, path.to_string_lossy().as_ref());
        }
    }

    fn message(&self, message: &str) {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_message(message);
        }
    }

    fn phase_end(&self, phase: &str) {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(phase);
        }
    }
}
