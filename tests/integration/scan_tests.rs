use dupefind::duplicates::{DuplicateFinder, FinderConfig};
use dupefind::scanner::{HashAlgorithm, PrefixMode};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn canonical(dir: &Path, name: &str) -> PathBuf {
    fs::canonicalize(dir).unwrap().join(name)
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "content a").unwrap();
    fs::write(dir.path().join("b.txt"), "content bb").unwrap();
    fs::write(dir.path().join("c.txt"), "content ccc").unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.eliminated_by_size, 3);
    assert_eq!(summary.partial_candidates, 0);
}

#[test]
fn test_scenario_a_same_size_different_content() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "hello").unwrap();
    fs::write(dir.path().join("b"), "hello").unwrap();
    fs::write(dir.path().join("c"), "world").unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].savings(), 5);
    assert_eq!(
        groups[0].paths,
        vec![canonical(dir.path(), "a"), canonical(dir.path(), "b")]
    );
    assert_eq!(summary.eliminated_by_prefix, 1);
}

#[test]
fn test_scenario_b_late_difference_in_large_files() {
    let dir = tempdir().unwrap();
    let size = 10 * 1024 * 1024;
    let mut content = vec![0xA5u8; size];
    fs::write(dir.path().join("big1.bin"), &content).unwrap();
    content[5000] = 0x5A;
    fs::write(dir.path().join("big2.bin"), &content).unwrap();

    let (groups, summary) = DuplicateFinder::new(FinderConfig::default().with_prefix_len(4096))
        .find_duplicates(dir.path())
        .unwrap();

    // Together after stage one, split by stage two.
    assert_eq!(summary.partial_candidates, 2);
    assert_eq!(summary.eliminated_by_prefix, 0);
    assert_eq!(summary.full_candidates, 2);
    assert_eq!(summary.eliminated_by_digest, 2);
    assert!(groups.is_empty());
}

#[test]
fn test_scenario_c_empty_files_and_symlinks_ignored() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty1"), "").unwrap();
    fs::write(dir.path().join("empty2"), "").unwrap();
    fs::write(dir.path().join("target.txt"), "linked content").unwrap();

    #[cfg(unix)]
    std::os::unix::fs::symlink(
        dir.path().join("target.txt"),
        dir.path().join("link.txt"),
    )
    .unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
    assert_eq!(summary.skipped_empty, 2);
    #[cfg(unix)]
    assert_eq!(summary.skipped_symlinks, 1);
}

#[test]
fn test_nested_directories() {
    let dir = tempdir().unwrap();
    let deep = dir.path().join("one").join("two").join("three");
    fs::create_dir_all(&deep).unwrap();
    fs::create_dir_all(dir.path().join("side")).unwrap();

    fs::write(dir.path().join("top.dat"), "nested duplicate").unwrap();
    fs::write(deep.join("deep.dat"), "nested duplicate").unwrap();
    fs::write(dir.path().join("side").join("side.dat"), "nested duplicate").unwrap();

    let (groups, summary) = DuplicateFinder::new(FinderConfig::default().with_io_threads(3))
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(summary.duplicate_files, 2);
    assert_eq!(summary.reclaimable_space, 32);
}

#[test]
fn test_multiple_groups_sorted_by_savings() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("small1"), "ab").unwrap();
    fs::write(dir.path().join("small2"), "ab").unwrap();
    fs::write(dir.path().join("large1"), "abcdefghij").unwrap();
    fs::write(dir.path().join("large2"), "abcdefghij").unwrap();

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].savings(), 10);
    assert_eq!(groups[1].savings(), 2);
}

#[test]
fn test_every_algorithm_and_prefix_mode_agree() {
    let dir = tempdir().unwrap();
    for i in 0..4 {
        fs::write(dir.path().join(format!("dup{i}")), vec![7u8; 9000]).unwrap();
    }
    let mut unique = vec![7u8; 9000];
    unique[8999] = 8;
    fs::write(dir.path().join("almost"), &unique).unwrap();

    for algorithm in [HashAlgorithm::Xxh3, HashAlgorithm::Blake3] {
        for mode in [PrefixMode::Bytes, PrefixMode::Hashed] {
            let config = FinderConfig::default()
                .with_algorithm(algorithm)
                .with_prefix_mode(mode)
                .with_prefix_len(128);
            let (groups, _) = DuplicateFinder::new(config)
                .find_duplicates(dir.path())
                .unwrap();

            assert_eq!(groups.len(), 1, "{algorithm} / {mode:?}");
            assert_eq!(groups[0].len(), 4, "{algorithm} / {mode:?}");
            assert_eq!(
                groups[0].signature.as_bytes().len(),
                algorithm.digest_len()
            );
        }
    }
}

#[test]
fn test_paranoid_mode_confirms_groups() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "verified").unwrap();
    fs::write(dir.path().join("b"), "verified").unwrap();

    let (groups, summary) = DuplicateFinder::new(FinderConfig::default().with_paranoid(true))
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(summary.eliminated_by_verify, 0);
}

#[test]
fn test_skip_hidden() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("visible"), "hidden twin").unwrap();
    fs::write(dir.path().join(".hidden"), "hidden twin").unwrap();

    let (with_hidden, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let (without_hidden, _) = DuplicateFinder::new(FinderConfig::default().with_skip_hidden(true))
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(with_hidden.len(), 1);
    assert!(without_hidden.is_empty());
}

#[test]
fn test_repeated_runs_are_identical() {
    let dir = tempdir().unwrap();
    for d in 0..5 {
        let sub = dir.path().join(format!("d{d}"));
        fs::create_dir(&sub).unwrap();
        for f in 0..6 {
            fs::write(sub.join(format!("f{f}")), format!("content-{}", f % 3)).unwrap();
        }
    }

    let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(4));
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    for _ in 0..3 {
        let (again, _) = finder.find_duplicates(dir.path()).unwrap();
        assert_eq!(first, again);
    }
    assert_eq!(first.len(), 3);
    assert!(first.iter().all(|g| g.len() == 10));
}

#[test]
fn test_wide_directory_single_worker() {
    let dir = tempdir().unwrap();
    for i in 0..300 {
        let sub = dir.path().join(format!("sub{i:03}"));
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("file"), format!("{:08}", i % 150)).unwrap();
    }

    let (groups, summary) = DuplicateFinder::new(FinderConfig::default().with_io_threads(1))
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(summary.total_files, 300);
    assert_eq!(groups.len(), 150);
    assert!(groups.iter().all(|g| g.len() == 2 && g.savings() == 8));
}
