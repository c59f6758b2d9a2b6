use dupfind::duplicates::{DuplicateFinder, FinderConfig, MatchStrategy};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn scan(root: &Path, strategy: MatchStrategy, threads: usize) -> dupfind::duplicates::ScanResult {
    let config = FinderConfig::default()
        .with_strategy(strategy)
        .with_io_threads(threads);
    DuplicateFinder::new(config).find_duplicates(root).unwrap().0
}

#[test]
fn test_strategies_agree_on_mixed_tree() {
    let dir = tempdir().unwrap();
    let contents: [&[u8]; 5] = [b"aaaa", b"bbbb", b"aaaa", b"cccccc", b"aaab"];
    for i in 0..25 {
        let sub = dir.path().join(format!("dir{}", i % 3));
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join(format!("file{:02}", i)), contents[i % contents.len()]).unwrap();
    }

    let checksum = scan(dir.path(), MatchStrategy::Checksum, 4);
    let pairwise = scan(dir.path(), MatchStrategy::Pairwise, 4);

    assert_eq!(checksum.memberships(), pairwise.memberships());
    assert!(!checksum.is_empty());
    assert!(checksum.iter().all(|g| g.hash.is_some()));
    assert!(pairwise.iter().all(|g| g.hash.is_none()));
}

#[test]
fn test_strategies_keep_identical_order() {
    let dir = tempdir().unwrap();
    for (name, content) in [
        ("a", "first"),
        ("b", "other"),
        ("c", "first"),
        ("d", "other"),
        ("e", "first"),
    ] {
        fs::write(dir.path().join(name), content).unwrap();
    }

    let checksum = scan(dir.path(), MatchStrategy::Checksum, 1);
    let pairwise = scan(dir.path(), MatchStrategy::Pairwise, 1);

    let files = |r: &dupfind::duplicates::ScanResult| -> Vec<Vec<std::path::PathBuf>> {
        r.iter().map(|g| g.files.clone()).collect()
    };
    assert_eq!(files(&checksum), files(&pairwise));
    assert_eq!(
        files(&checksum),
        vec![
            vec![dir.path().join("a"), dir.path().join("c"), dir.path().join("e")],
            vec![dir.path().join("b"), dir.path().join("d")],
        ]
    );
}

#[test]
fn test_worker_count_does_not_change_output() {
    let dir = tempdir().unwrap();
    for i in 0..40 {
        // 8 sizes with two 2-file classes each
        let content = format!("{}{}", "x".repeat(i % 8 + 1), i % 3);
        fs::write(dir.path().join(format!("f{:02}", i)), content).unwrap();
    }

    for strategy in [MatchStrategy::Checksum, MatchStrategy::Pairwise] {
        let one = scan(dir.path(), strategy, 1);
        let many = scan(dir.path(), strategy, 16);
        assert_eq!(one, many, "{} output depends on worker count", strategy);
        assert_eq!(one.len(), 16);
    }
}
