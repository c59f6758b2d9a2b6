use dupfind::duplicates::{DuplicateFinder, FinderConfig};
use dupfind::scanner::WalkerConfig;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tempfile::tempdir;

fn create(path: PathBuf, content: &[u8]) -> PathBuf {
    File::create(&path).unwrap().write_all(content).unwrap();
    path
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(result.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    create(dir.path().join("a.txt"), b"content a");
    create(dir.path().join("b.txt"), b"content b");
    create(dir.path().join("c.txt"), b"content c");

    let finder = DuplicateFinder::with_defaults();
    let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(result.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.buckets, 1);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_a_b_c_empty() {
    let dir = tempdir().unwrap();
    let a = create(dir.path().join("a"), b"X");
    let b = create(dir.path().join("b"), b"X");
    create(dir.path().join("c"), b"Y");
    create(dir.path().join("empty"), b"");

    let finder = DuplicateFinder::with_defaults();
    let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.groups()[0].files, vec![a, b]);
    assert_eq!(result.groups()[0].size, 1);
    assert_eq!(summary.empty_files, 1);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_space, 1);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    fs::create_dir(&sub).unwrap();
    let deeper = sub.join("deeper");
    fs::create_dir(&deeper).unwrap();

    let top = create(dir.path().join("a.txt"), b"nested duplicate");
    let mid = create(sub.join("b.txt"), b"nested duplicate");
    let low = create(deeper.join("c.txt"), b"nested duplicate");

    let finder = DuplicateFinder::with_defaults();
    let (result, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.groups()[0].files, vec![top, mid, low]);
}

#[test]
fn test_scan_multiple_groups() {
    let dir = tempdir().unwrap();
    for i in 0..3 {
        create(dir.path().join(format!("alpha_{}.txt", i)), b"group alpha");
        create(dir.path().join(format!("beta_{}.txt", i)), b"group beta!!");
    }

    let finder = DuplicateFinder::with_defaults();
    let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(summary.duplicate_files, 4);
    for group in &result {
        assert_eq!(group.len(), 3);
        let contents: BTreeSet<Vec<u8>> =
            group.files.iter().map(|p| fs::read(p).unwrap()).collect();
        assert_eq!(contents.len(), 1, "group members must be byte-identical");
    }
}

#[test]
fn test_scan_same_size_different_content() {
    let dir = tempdir().unwrap();
    let p = create(dir.path().join("p"), b"0123456789");
    let q = create(dir.path().join("q"), b"0123456789");
    create(dir.path().join("r"), b"0123456780");

    let finder = DuplicateFinder::with_defaults();
    let (result, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.groups()[0].files, vec![p, q]);
    assert_eq!(summary.eliminated_by_size, 0);
}

#[test]
fn test_scan_skip_hidden() {
    let dir = tempdir().unwrap();
    create(dir.path().join("visible.txt"), b"shared");
    create(dir.path().join(".hidden.txt"), b"shared");

    let finder = DuplicateFinder::with_defaults();
    let (result, _) = finder.find_duplicates(dir.path()).unwrap();
    assert_eq!(result.len(), 1);

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new(true, None));
    let (result, summary) = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();
    assert!(result.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_scan_max_depth() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    create(dir.path().join("top.txt"), b"same content");
    create(sub.join("below.txt"), b"same content");

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new(false, Some(1)));
    let (result, summary) = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_scan_twice_gives_same_result() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        let sub = dir.path().join(format!("d{}", i % 4));
        fs::create_dir_all(&sub).unwrap();
        create(sub.join(format!("f{}", i)), format!("payload {}", i % 6).as_bytes());
    }

    let finder = DuplicateFinder::with_defaults();
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first.memberships(), second.memberships());
    assert_eq!(first, second);
}

#[test]
fn test_scan_large_files_across_chunks() {
    let dir = tempdir().unwrap();
    let mut content = vec![0u8; 300 * 1024];
    for (i, byte) in content.iter_mut().enumerate() {
        *byte = (i % 251) as u8;
    }
    create(dir.path().join("big1.bin"), &content);
    create(dir.path().join("big2.bin"), &content);
    *content.last_mut().unwrap() ^= 0xFF;
    create(dir.path().join("big3.bin"), &content);

    let config = FinderConfig::default().with_chunk_size(8 * 1024);
    let (result, _) = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.groups()[0].len(), 2);
    assert!(!result.groups()[0].contains(&dir.path().join("big3.bin")));
}
