//! Directory walker built on walkdir.
//!
//! # Overview
//!
//! [`Walker`] lazily enumerates every regular file below a root directory.
//! walkdir keeps an explicit stack of open directories, so deep trees do not
//! grow the call stack, and children are sorted by name so a sequential walk
//! always visits files in the same order.
//!
//! # Features
//!
//! - Regular files only: directories, sockets, FIFOs, devices and
//!   unfollowed symlinks are skipped silently
//! - Optional symlink following with loop detection
//! - Gitignore-style pattern matching via the `ignore` crate
//! - Hidden file filtering and depth limits
//! - Access errors are yielded per entry and never end the walk
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use walkdir::{DirEntry, WalkDir};

use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// The path is not validated here; a missing root shows up as an error
    /// item from [`Walker::walk`].
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// The root this walker enumerates.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build the ignore matcher from configured patterns.
    fn build_gitignore(&self) -> Option<Gitignore> {
        if self.config.ignore_patterns.is_empty() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(&self.root);
        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(gitignore) if gitignore.is_empty() => None,
            Ok(gitignore) => Some(gitignore),
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    /// Whether an entry (and, for directories, its whole subtree) is excluded.
    fn is_excluded(&self, entry: &DirEntry, gitignore: Option<&Gitignore>) -> bool {
        // Never prune the root itself
        if entry.depth() == 0 {
            return false;
        }

        if self.config.skip_hidden && is_hidden(entry) {
            log::trace!("Skipping hidden entry: {}", entry.path().display());
            return true;
        }

        if let Some(gi) = gitignore {
            let relative_path = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            let path_str = relative_path.to_string_lossy();
            let normalized_path = if cfg!(windows) {
                path_str.replace('\\', "/")
            } else {
                path_str.into_owned()
            };

            if gi
                .matched(normalized_path, entry.file_type().is_dir())
                .is_ignore()
            {
                log::trace!("Ignoring: {}", entry.path().display());
                return true;
            }
        }

        false
    }

    /// Walk the directory tree, yielding file entries.
    ///
    /// Returns a lazy iterator over [`FileEntry`] results. Errors are yielded
    /// as [`ScanError`] values rather than stopping iteration. Each call
    /// starts a fresh traversal.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let gitignore = self.build_gitignore();

        let mut walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();
        if let Some(depth) = self.config.max_depth {
            // walkdir counts the root as depth 0
            walk_dir = walk_dir.max_depth(depth.saturating_add(1));
        }

        walk_dir
            .into_iter()
            .filter_entry(move |entry| !self.is_excluded(entry, gitignore.as_ref()))
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(entry),
                Err(e) => self.handle_walk_error(e).map(Err),
            })
    }

    /// Turn a walked entry into a [`FileEntry`] if it is a regular file.
    fn process_entry(&self, entry: DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return None;
        }

        if !file_type.is_file() {
            log::trace!("Skipping non-regular entry: {}", entry.path().display());
            return None;
        }

        match entry.metadata() {
            Ok(metadata) => Some(Ok(FileEntry::new(entry.into_path(), metadata.len()))),
            Err(e) => self.handle_walk_error(e).map(Err),
        }
    }

    /// Convert a walkdir error into a [`ScanError`], or `None` if the entry
    /// should be skipped silently.
    fn handle_walk_error(&self, error: walkdir::Error) -> Option<ScanError> {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        match error.io_error().map(io::Error::kind) {
            Some(ErrorKind::NotFound) if is_dangling_symlink(&path) => {
                log::debug!("Skipping dangling symlink: {}", path.display());
                None
            }
            Some(ErrorKind::PermissionDenied) => {
                log::warn!("Permission denied: {}", path.display());
                Some(ScanError::PermissionDenied(path))
            }
            Some(ErrorKind::NotFound) => {
                log::debug!("Entry not found (may have been deleted): {}", path.display());
                Some(ScanError::NotFound(path))
            }
            _ => {
                log::warn!("Walker error for {}: {}", path.display(), error);
                let message = error.to_string();
                let source = error
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other(message));
                Some(ScanError::Io { path, source })
            }
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_dangling_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
        && std::fs::metadata(path).is_err()
}
