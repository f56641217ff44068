//! Key-based grouping of discovered files.
//!
//! # Overview
//!
//! A [`GroupAccumulator`] collects paths under a key (a content digest or a
//! base filename) in the order they are discovered. Keys are OS strings and
//! compared byte for byte, so file names that are not valid UTF-8 never
//! collide after a lossy conversion. Once a scan has fed every
//! file in, [`GroupAccumulator::into_duplicates`] drops every key with a
//! single member and returns the remaining [`DuplicateGroups`].
//!
//! # Example
//!
//! ```
//! use dupescan::duplicates::GroupAccumulator;
//! use std::path::PathBuf;
//!
//! let mut acc = GroupAccumulator::new();
//! acc.insert("a.txt".to_string(), PathBuf::from("/x/a.txt"));
//! acc.insert("b.txt".to_string(), PathBuf::from("/x/b.txt"));
//! acc.insert("a.txt".to_string(), PathBuf::from("/y/a.txt"));
//!
//! let groups = acc.into_duplicates();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups.get("a.txt").unwrap().len(), 2);
//! assert!(groups.get("b.txt").is_none());
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::scanner::FileEntry;

/// Files sharing one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Content digest (hex) or base filename
    #[serde(serialize_with = "serialize_key")]
    pub key: OsString,
    /// Member paths in discovery order
    pub files: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new group.
    #[must_use]
    pub fn new(key: impl Into<OsString>, files: Vec<PathBuf>) -> Self {
        Self {
            key: key.into(),
            files,
        }
    }

    /// The key for display; invalid UTF-8 is replaced with U+FFFD.
    #[must_use]
    pub fn display_key(&self) -> Cow<'_, str> {
        self.key.to_string_lossy()
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if this group has duplicates (2+ files).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.files.len() > 1
    }

    /// Members beyond the first one.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Whether the given path is a member.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|p| p == path)
    }
}

/// Append-only key to paths mapping owned by a single scan.
#[derive(Debug, Default)]
pub struct GroupAccumulator {
    index: HashMap<OsString, usize>,
    groups: Vec<DuplicateGroup>,
}

impl GroupAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path under a key, creating the group on first sight.
    pub fn insert(&mut self, key: impl Into<OsString>, path: PathBuf) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&slot) => self.groups[slot].files.push(path),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push(DuplicateGroup::new(key, vec![path]));
            }
        }
    }

    /// Number of distinct keys seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether nothing has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of paths inserted so far.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::len).sum()
    }

    /// Drop singleton keys and return the duplicate groups.
    #[must_use]
    pub fn into_duplicates(self) -> DuplicateGroups {
        let groups: Vec<DuplicateGroup> = self
            .groups
            .into_iter()
            .filter(DuplicateGroup::has_duplicates)
            .collect();
        DuplicateGroups::from(groups)
    }
}

/// The result of a scan: every key with two or more files.
///
/// Groups iterate in the order their key was first discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DuplicateGroups {
    groups: Vec<DuplicateGroup>,
}

impl From<Vec<DuplicateGroup>> for DuplicateGroups {
    fn from(groups: Vec<DuplicateGroup>) -> Self {
        debug_assert!(groups.iter().all(DuplicateGroup::has_duplicates));
        Self { groups }
    }
}

impl DuplicateGroups {
    /// Number of duplicate groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Paths grouped under a key.
    #[must_use]
    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&[PathBuf]> {
        let key = key.as_ref();
        self.groups
            .iter()
            .find(|g| g.key.as_os_str() == key)
            .map(|g| g.files.as_slice())
    }

    /// Whether a key has a duplicate group.
    #[must_use]
    pub fn contains_key(&self, key: impl AsRef<OsStr>) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over groups in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, DuplicateGroup> {
        self.groups.iter()
    }

    /// Iterate over keys in discovery order.
    pub fn keys(&self) -> impl Iterator<Item = &OsStr> {
        self.groups.iter().map(|g| g.key.as_os_str())
    }

    /// Total members beyond the first in each group.
    #[must_use]
    pub fn duplicate_files(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::duplicate_count).sum()
    }

    /// Convert into a plain map from key to paths.
    #[must_use]
    pub fn into_map(self) -> HashMap<OsString, Vec<PathBuf>> {
        self.groups.into_iter().map(|g| (g.key, g.files)).collect()
    }
}

impl IntoIterator for DuplicateGroups {
    type Item = DuplicateGroup;
    type IntoIter = std::vec::IntoIter<DuplicateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'a> IntoIterator for &'a DuplicateGroups {
    type Item = &'a DuplicateGroup;
    type IntoIter = std::slice::Iter<'a, DuplicateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Group key for by-name mode: the last path component, byte for byte.
#[must_use]
pub fn name_key(path: &Path) -> OsString {
    path.file_name().map(OsStr::to_os_string).unwrap_or_default()
}

fn serialize_key<S: Serializer>(key: &OsString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&key.to_string_lossy())
}

/// Group already-discovered files by base filename.
#[must_use]
pub fn group_by_name(files: Vec<FileEntry>) -> DuplicateGroups {
    let mut accumulator = GroupAccumulator::new();
    for file in files {
        accumulator.insert(name_key(&file.path), file.path);
    }
    accumulator.into_duplicates()
}
