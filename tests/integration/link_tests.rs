use dupescan::duplicates::{DuplicateFinder, FinderConfig, ScanRoot};
use dupescan::scanner::WalkerConfig;
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_hardlinks_are_reported_as_duplicates() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.txt");
    let hardlink = dir.path().join("hardlink.txt");

    File::create(&original)
        .unwrap()
        .write_all(b"identical content")
        .unwrap();

    if let Err(e) = fs::hard_link(&original, &hardlink) {
        eprintln!("Skipping hardlink test: failed to create hardlink: {}", e);
        return;
    }

    let finder = DuplicateFinder::open(dir.path()).unwrap();
    let (groups, summary) = finder.find_duplicates_by_content().unwrap();

    // No inode deduplication: both names are listed
    assert_eq!(groups.len(), 1);
    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.duplicate_files, 1);
}

#[test]
#[cfg(unix)]
fn test_symlinks_ignored_by_default() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("target.txt");
    File::create(&target).unwrap().write_all(b"data").unwrap();
    std::os::unix::fs::symlink(&target, dir.path().join("link.txt")).unwrap();

    let finder = DuplicateFinder::open(dir.path()).unwrap();
    let (groups, summary) = finder.find_duplicates_by_content().unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
#[cfg(unix)]
fn test_followed_symlink_duplicates_its_target() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("target.txt");
    File::create(&target).unwrap().write_all(b"data").unwrap();
    std::os::unix::fs::symlink(&target, dir.path().join("link.txt")).unwrap();

    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::default().with_follow_symlinks(true));
    let finder = DuplicateFinder::new(ScanRoot::new(dir.path()).unwrap(), config);
    let (groups, summary) = finder.find_duplicates_by_content().unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(summary.total_files, 2);
}

#[test]
#[cfg(unix)]
fn test_symlink_loop_does_not_hang() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    File::create(sub.join("file.txt"))
        .unwrap()
        .write_all(b"loop")
        .unwrap();
    std::os::unix::fs::symlink(dir.path(), sub.join("back")).unwrap();

    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::default().with_follow_symlinks(true));
    let finder = DuplicateFinder::new(ScanRoot::new(dir.path()).unwrap(), config);
    let (_, summary) = finder.find_duplicates_by_content().unwrap();

    // The loop is reported as a traversal error, the real file is still seen
    assert_eq!(summary.total_files, 1);
    assert!(summary.has_errors());
}
