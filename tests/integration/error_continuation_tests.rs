use dupescan::duplicates::{DuplicateFinder, FinderConfig, FinderError, ScanRoot};
use dupescan::progress::ProgressCallback;
use dupescan::scanner::{HashError, Hasher, ScanError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::tempdir;

/// Deletes one file when the scan reports reaching it, before it is opened.
struct RemoveOnVisit {
    target: PathBuf,
}

impl ProgressCallback for RemoveOnVisit {
    fn on_phase_start(&self, _phase: &str, _total: usize) {}

    fn on_progress(&self, _current: usize, path: &str) {
        if Path::new(path) == self.target {
            fs::remove_file(&self.target).unwrap();
        }
    }

    fn on_phase_end(&self, _phase: &str) {}
}

fn finder_removing(root: &Path, target: &Path, strict: bool) -> DuplicateFinder {
    DuplicateFinder::new(
        ScanRoot::new(root).unwrap(),
        FinderConfig::default()
            .with_strict(strict)
            .with_progress_callback(Arc::new(RemoveOnVisit {
                target: target.to_path_buf(),
            })),
    )
}

#[test]
fn test_file_removed_mid_scan_is_skipped_and_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "same").unwrap();
    fs::write(dir.path().join("b.txt"), "same").unwrap();
    let removed = dir.path().join("c.txt");
    fs::write(&removed, "same").unwrap();

    let finder = finder_removing(dir.path(), &removed, false);
    let (groups, summary) = finder.find_duplicates_by_content().unwrap();

    assert_eq!(groups.len(), 1);
    let group = groups.iter().next().unwrap();
    assert!(!group.files.contains(&removed));
    assert_eq!(group.len(), 2);
    assert_eq!(summary.total_files, 3);
    assert!(matches!(
        summary.errors.as_slice(),
        [ScanError::Hash(HashError::NotFound(p))] if p == &removed
    ));
}

#[test]
fn test_file_removed_mid_scan_aborts_strict_mode() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "same").unwrap();
    let removed = dir.path().join("b.txt");
    fs::write(&removed, "same").unwrap();

    let finder = finder_removing(dir.path(), &removed, true);

    match finder.find_duplicates_by_content() {
        Err(FinderError::Scan(ScanError::Hash(HashError::NotFound(p)))) => assert_eq!(p, removed),
        other => panic!("Expected strict NotFound abort, got {:?}", other.map(|(g, _)| g.len())),
    }
}

#[test]
fn test_hash_missing_file_reports_not_found() {
    let hasher = Hasher::new();
    let err = hasher
        .hash_file(&PathBuf::from("nonexistent_1.txt"))
        .unwrap_err();

    assert!(matches!(err, HashError::NotFound(_)));
    assert_eq!(err.path(), PathBuf::from("nonexistent_1.txt"));
}

#[test]
fn test_scan_error_wraps_hash_error() {
    let err = ScanError::from(HashError::PermissionDenied(PathBuf::from("/locked")));

    assert_eq!(err.path(), PathBuf::from("/locked"));
    assert_eq!(err.to_string(), "Permission denied: /locked");
}

#[test]
fn test_strict_error_is_transparent() {
    let err = FinderError::from(ScanError::NotFound(PathBuf::from("/gone")));

    assert!(!err.is_invalid_root());
    assert_eq!(err.to_string(), "Path not found: /gone");
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Root bypasses permission bits; such environments cannot exercise these paths.
    fn permissions_enforced(path: &std::path::Path) -> bool {
        fs::read_dir(path).is_err() && fs::File::open(path).is_err()
    }

    #[test]
    fn test_unreadable_directory_is_skipped_and_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "same").unwrap();
        fs::write(dir.path().join("b.txt"), "same").unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("c.txt"), "same").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        if !permissions_enforced(&locked) {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let finder = DuplicateFinder::open(dir.path()).unwrap();
        let result = finder.find_duplicates_by_content();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let (groups, summary) = result.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.iter().next().unwrap().len(), 2);
        assert_eq!(summary.errors.len(), 1);
        assert!(matches!(summary.errors[0], ScanError::PermissionDenied(_)));
        assert_eq!(summary.errors[0].path(), locked.as_path());
    }

    #[test]
    fn test_unreadable_directory_fails_in_strict_mode() {
        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        if !permissions_enforced(&locked) {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let finder = DuplicateFinder::new(
            ScanRoot::new(dir.path()).unwrap(),
            FinderConfig::default().with_strict(true),
        );
        let result = finder.find_duplicates_by_name();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(
            result,
            Err(FinderError::Scan(ScanError::PermissionDenied(_)))
        ));
    }

    #[test]
    fn test_unreadable_file_skipped_in_parallel_mode() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "same").unwrap();
        fs::write(dir.path().join("b.txt"), "same").unwrap();
        let locked = dir.path().join("c.txt");
        fs::write(&locked, "same").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        if fs::File::open(&locked).is_ok() {
            return;
        }

        let finder = DuplicateFinder::new(
            ScanRoot::new(dir.path()).unwrap(),
            FinderConfig::default().with_io_threads(4),
        );
        let (groups, summary) = finder.find_duplicates_by_content().unwrap();

        assert_eq!(groups.iter().next().unwrap().len(), 2);
        assert_eq!(summary.total_files, 3);
        assert!(matches!(
            summary.errors.as_slice(),
            [ScanError::Hash(HashError::PermissionDenied(_))]
        ));
    }
}
