use dupfind::duplicates::DuplicateFinder;
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_hardlinks_are_reported_as_separate_paths() {
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

    let finder = DuplicateFinder::with_defaults();
    let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

    // Two names, one content: they match like any other pair
    assert_eq!(summary.total_files, 2);
    assert_eq!(result.len(), 1);
    assert_eq!(result.groups()[0].files, vec![hardlink, original]);
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_followed() {
    let dir = tempdir().unwrap();
    let f1 = dir.path().join("f1");
    let f2 = dir.path().join("f2");
    let link = dir.path().join("f3");

    File::create(&f1).unwrap().write_all(b"linked").unwrap();
    File::create(&f2).unwrap().write_all(b"linked").unwrap();
    std::os::unix::fs::symlink(&f1, &link).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(result.len(), 1);
    assert_eq!(result.groups()[0].files, vec![f1, f2]);
    assert!(!result.groups()[0].contains(&link));
}

#[cfg(unix)]
#[test]
fn test_lone_file_with_symlink_is_not_a_duplicate() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("target.txt");
    File::create(&target).unwrap().write_all(b"only me").unwrap();
    std::os::unix::fs::symlink(&target, dir.path().join("alias.txt")).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(result.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[cfg(unix)]
#[test]
fn test_broken_symlink_is_ignored() {
    let dir = tempdir().unwrap();
    std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling")).unwrap();
    File::create(dir.path().join("real.txt"))
        .unwrap()
        .write_all(b"x")
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(result.is_empty());
    assert_eq!(summary.total_files, 1);
    assert!(!summary.has_failures());
}

#[cfg(unix)]
#[test]
fn test_directory_symlink_is_not_descended() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real");
    fs::create_dir(&real).unwrap();
    File::create(real.join("data.bin"))
        .unwrap()
        .write_all(b"payload")
        .unwrap();
    std::os::unix::fs::symlink(&real, dir.path().join("mirror")).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

    // Following the link would pair data.bin with itself
    assert!(result.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[cfg(unix)]
#[test]
fn test_symlink_cycle_terminates() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    std::os::unix::fs::symlink(dir.path(), sub.join("loop")).unwrap();

    let a = sub.join("a.txt");
    let b = dir.path().join("b.txt");
    File::create(&a).unwrap().write_all(b"cycle").unwrap();
    File::create(&b).unwrap().write_all(b"cycle").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(result.len(), 1);
    assert_eq!(result.groups()[0].files, vec![b, a]);
}
