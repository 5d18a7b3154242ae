// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::create_dir_all(dir.path().join("full/nested")).unwrap();
    fs::write(dir.path().join("full/nested/b.txt"), "b").unwrap();
    fs::create_dir(dir.path().join("empty")).unwrap();
    dir
}

#[test]
fn probes_report_kind() {
    let dir = tree();
    let fs = LocalFileSystem::new();

    assert!(fs.is_file(&dir.path().join("a.txt")));
    assert!(fs.is_dir(&dir.path().join("full")));
    assert!(!fs.exists(&dir.path().join("missing")));
}

#[test]
fn is_empty_dir_distinguishes_errors() {
    let dir = tree();
    let fs = LocalFileSystem::new();

    assert!(fs.is_empty_dir(&dir.path().join("empty")).unwrap());
    assert!(!fs.is_empty_dir(&dir.path().join("full")).unwrap());
    assert!(matches!(
        fs.is_empty_dir(&dir.path().join("a.txt")),
        Err(FsError::NotADirectory(_))
    ));
    assert!(matches!(
        fs.is_empty_dir(&dir.path().join("missing")),
        Err(FsError::NotFound(_))
    ));
}

#[test]
fn remove_empty_dir_refuses_non_empty() {
    let dir = tree();
    let fs = LocalFileSystem::new();

    assert!(fs.remove_empty_dir(&dir.path().join("full")).is_err());
    fs.remove_empty_dir(&dir.path().join("empty")).unwrap();
    assert!(!dir.path().join("empty").exists());
}

#[test]
fn delete_recursively_removes_tree() {
    let dir = tree();
    let fs = LocalFileSystem::new();

    assert!(fs.delete_recursively(&dir.path().join("full")));
    assert!(!dir.path().join("full").exists());
    assert!(!fs.delete_recursively(&dir.path().join("full")));
}

#[test]
fn delete_dir_contents_keeps_directory() {
    let dir = tree();
    let fs = LocalFileSystem::new();

    fs.delete_dir_contents(dir.path()).unwrap();

    assert!(dir.path().is_dir());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[cfg(unix)]
#[test]
fn delete_recursively_removes_link_not_target() {
    let dir = tree();
    let fs = LocalFileSystem::new();
    let link = dir.path().join("link");
    std::os::unix::fs::symlink(dir.path().join("full"), &link).unwrap();

    assert!(fs.delete_recursively(&link));

    assert!(!fs.exists(&link));
    assert!(dir.path().join("full/nested/b.txt").exists());
}
