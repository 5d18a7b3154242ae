// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn add_file_creates_parent_directories() {
    let fs = FakeFileSystem::new();
    fs.add_file("/data/in/a.txt");

    assert!(fs.is_file(Path::new("/data/in/a.txt")));
    assert!(fs.is_dir(Path::new("/data/in")));
    assert!(fs.is_dir(Path::new("/data")));
    assert!(!fs.is_empty_dir(Path::new("/data/in")).unwrap());
}

#[test]
fn is_empty_dir_rejects_files() {
    let fs = FakeFileSystem::new();
    fs.add_file("/data/a.txt");

    let err = fs.is_empty_dir(Path::new("/data/a.txt")).unwrap_err();
    assert!(matches!(err, FsError::NotADirectory(_)));
}

#[test]
fn delete_dir_contents_keeps_directory() {
    let fs = FakeFileSystem::new();
    fs.add_file("/data/a.txt");
    fs.add_file("/data/nested/b.txt");

    fs.delete_dir_contents(Path::new("/data")).unwrap();

    assert!(fs.is_dir(Path::new("/data")));
    assert_eq!(fs.descendant_count("/data"), 0);
}

#[test]
fn stuck_recursive_delete_reports_failure_and_keeps_tree() {
    let fs = FakeFileSystem::new();
    fs.add_file("/data/a.txt");
    fs.fail_recursive_delete("/data");

    assert!(!fs.delete_recursively(Path::new("/data")));
    assert!(fs.exists(Path::new("/data/a.txt")));
    assert_eq!(
        fs.calls(),
        vec![FsCall::DeleteRecursively(PathBuf::from("/data"))]
    );
}

#[test]
fn denied_delete_file_fails_with_permission_error() {
    let fs = FakeFileSystem::new();
    fs.add_file("/data/a.txt");
    fs.deny("/data/a.txt");

    let err = fs.delete_file(Path::new("/data/a.txt")).unwrap_err();
    assert!(matches!(err, FsError::PermissionDenied { .. }));
    assert!(fs.exists(Path::new("/data/a.txt")));
}

#[test]
fn special_entry_exists_but_is_neither_file_nor_dir() {
    let fs = FakeFileSystem::new();
    fs.add_special("/run/app.sock");

    assert!(fs.exists(Path::new("/run/app.sock")));
    assert!(!fs.is_file(Path::new("/run/app.sock")));
    assert!(!fs.is_dir(Path::new("/run/app.sock")));
}
