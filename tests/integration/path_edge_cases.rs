use dupescan::duplicates::{DuplicateFinder, ScanMode};
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_paths_with_quotes() {
    let dir = tempdir().unwrap();

    // Windows does not allow double quotes in filenames.
    if cfg!(not(windows)) {
        let quote_name = "file_with_\"quote\".txt";
        File::create(dir.path().join(quote_name))
            .expect("Failed to create file with quotes")
            .write_all(b"content")
            .unwrap();
        File::create(dir.path().join("duplicate.txt"))
            .unwrap()
            .write_all(b"content")
            .unwrap();

        let finder = DuplicateFinder::open(dir.path()).unwrap();
        let (groups, _) = finder.find_duplicates_by_content().unwrap();

        assert_eq!(groups.len(), 1);
        assert!(groups
            .iter()
            .next()
            .unwrap()
            .files
            .iter()
            .any(|f| f.to_string_lossy().contains('"')));
    }
}

#[test]
fn test_paths_with_newlines() {
    let dir = tempdir().unwrap();

    // Windows does not allow newlines in filenames.
    if cfg!(not(windows)) {
        File::create(dir.path().join("file_with\nnewline.txt"))
            .expect("Failed to create file with newline")
            .write_all(b"content")
            .unwrap();
        File::create(dir.path().join("duplicate.txt"))
            .unwrap()
            .write_all(b"content")
            .unwrap();

        let finder = DuplicateFinder::open(dir.path()).unwrap();
        let (groups, _) = finder.find_duplicates_by_content().unwrap();

        assert_eq!(groups.len(), 1);
    }
}

#[test]
fn test_unicode_names_group_by_name() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("один")).unwrap();
    fs::create_dir(dir.path().join("二")).unwrap();
    File::create(dir.path().join("один").join("résumé 📄.txt"))
        .unwrap()
        .write_all(b"v1")
        .unwrap();
    File::create(dir.path().join("二").join("résumé 📄.txt"))
        .unwrap()
        .write_all(b"v2")
        .unwrap();

    let finder = DuplicateFinder::open(dir.path()).unwrap();
    let (groups, _) = finder.find_duplicates(ScanMode::Name).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups.get("résumé 📄.txt").unwrap().len(), 2);
}

#[test]
fn test_names_are_case_sensitive() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    fs::create_dir(dir.path().join("b")).unwrap();
    File::create(dir.path().join("a").join("Readme.md")).unwrap();
    File::create(dir.path().join("b").join("README.md")).unwrap();

    let finder = DuplicateFinder::open(dir.path()).unwrap();
    let (groups, _) = finder.find_duplicates(ScanMode::Name).unwrap();

    assert!(groups.is_empty());
}

#[test]
fn test_root_path_is_kept_as_given() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("a.txt"))
        .unwrap()
        .write_all(b"same")
        .unwrap();
    File::create(dir.path().join("b.txt"))
        .unwrap()
        .write_all(b"same")
        .unwrap();

    let dotted = dir.path().join(".");
    let finder = DuplicateFinder::open(&dotted).unwrap();
    let (groups, _) = finder.find_duplicates_by_content().unwrap();

    let files = &groups.iter().next().unwrap().files;
    assert!(files.iter().all(|p| p.starts_with(&dotted)));
}

#[test]
fn test_deeply_nested_tree() {
    let dir = tempdir().unwrap();
    let mut path = dir.path().to_path_buf();
    for i in 0..40 {
        path.push(format!("level{}", i));
    }
    fs::create_dir_all(&path).unwrap();
    File::create(path.join("deep.txt"))
        .unwrap()
        .write_all(b"bottom")
        .unwrap();
    File::create(dir.path().join("shallow.txt"))
        .unwrap()
        .write_all(b"bottom")
        .unwrap();

    let finder = DuplicateFinder::open(dir.path()).unwrap();
    let (groups, summary) = finder.find_duplicates_by_content().unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_non_utf8_names_group_by_raw_bytes() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::create_dir(&a).unwrap();
    fs::create_dir(&b).unwrap();
    let ff = OsStr::from_bytes(b"r\xff.txt");
    let fe = OsStr::from_bytes(b"r\xfe.txt");

    // Some filesystems reject names that are not valid UTF-8.
    if fs::write(a.join(ff), "one").is_err() {
        return;
    }
    fs::write(b.join(fe), "two").unwrap();

    let finder = DuplicateFinder::open(dir.path()).unwrap();
    let (groups, summary) = finder.find_duplicates(ScanMode::Name).unwrap();
    assert_eq!(summary.total_files, 2);
    assert!(groups.is_empty());

    fs::write(b.join(ff), "three").unwrap();
    let (groups, _) = finder.find_duplicates(ScanMode::Name).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups.get(ff).unwrap(), vec![a.join(ff), b.join(ff)]);
}
