//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Validating the scan root
//! - Keying files by content digest or base filename
//! - Collecting keys into duplicate groups, dropping singletons

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanMode, ScanRoot, ScanSummary};
pub use groups::{group_by_name, name_key, DuplicateGroup, DuplicateGroups, GroupAccumulator};
