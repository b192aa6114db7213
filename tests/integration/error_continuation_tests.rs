use dupefind::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupefind::scanner::{FileRecord, HashError, ScanError};
use dupefind::signal::CancelToken;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_find_duplicates_from_records_continues_on_error() {
    let finder = DuplicateFinder::with_defaults();
    let records = vec![
        FileRecord::new(PathBuf::from("nonexistent_1.txt"), 100),
        FileRecord::new(PathBuf::from("nonexistent_2.txt"), 100),
    ];

    let (groups, summary) = finder.find_duplicates_from_records(records).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.errors.len(), 2);
    for err in &summary.errors {
        match err {
            ScanError::Hash(HashError::NotFound(_)) => {}
            _ => panic!("Expected NotFound HashError, got: {:?}", err),
        }
    }
}

#[test]
fn test_missing_file_does_not_block_others() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::write(&a, "same bytes").unwrap();
    fs::write(&b, "same bytes").unwrap();

    let records = vec![
        FileRecord::new(a, 10),
        FileRecord::new(b, 10),
        FileRecord::new(dir.path().join("vanished"), 10),
    ];
    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_from_records(records)
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(summary.errors.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_scenario_d_unreadable_file_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("ok1"), "readable dup").unwrap();
    fs::write(dir.path().join("ok2"), "readable dup").unwrap();
    let locked = dir.path().join("locked");
    fs::write(&locked, "readable dup").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not apply to root.
    let enforced = fs::File::open(&locked).is_err();

    let result = DuplicateFinder::with_defaults().find_duplicates(dir.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    let (groups, summary) = result.unwrap();

    assert_eq!(groups.len(), 1);
    if enforced {
        assert_eq!(groups[0].len(), 2);
        assert!(groups[0].paths.iter().all(|p| !p.ends_with("locked")));
        assert!(summary
            .errors
            .iter()
            .any(|e| matches!(e, ScanError::Hash(HashError::PermissionDenied(_)))));
    } else {
        assert_eq!(groups[0].len(), 3);
    }
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x1"), "outside").unwrap();
    fs::write(dir.path().join("x2"), "outside").unwrap();
    let sealed = dir.path().join("sealed");
    fs::create_dir(&sealed).unwrap();
    fs::write(sealed.join("inner"), "outside").unwrap();
    fs::set_permissions(&sealed, fs::Permissions::from_mode(0o000)).unwrap();

    let enforced = fs::read_dir(&sealed).is_err();

    let result = DuplicateFinder::with_defaults().find_duplicates(dir.path());
    fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();
    let (groups, summary) = result.unwrap();

    assert_eq!(groups.len(), 1);
    if enforced {
        assert_eq!(groups[0].len(), 2);
        assert!(!summary.errors.is_empty());
    } else {
        assert_eq!(groups[0].len(), 3);
    }
}

#[test]
fn test_missing_root_is_top_level_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let err = DuplicateFinder::with_defaults()
        .find_duplicates(&missing)
        .unwrap_err();
    assert!(matches!(err, FinderError::PathNotFound(_)));
}

#[test]
fn test_file_root_is_top_level_error() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain");
    fs::write(&file, "x").unwrap();

    let err = DuplicateFinder::with_defaults()
        .find_duplicates(&file)
        .unwrap_err();
    assert!(matches!(err, FinderError::NotADirectory(_)));
}

#[test]
fn test_cancelled_scan_reports_interrupted() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "x").unwrap();

    let token = CancelToken::new();
    token.cancel();
    let finder = DuplicateFinder::new(FinderConfig::default().with_cancel_token(token));

    assert!(matches!(
        finder.find_duplicates(dir.path()),
        Err(FinderError::Interrupted)
    ));
}
