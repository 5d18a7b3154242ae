// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem adapter backed by `std::fs`

use fp_core::{FileSystem, FsError};
use std::fs;
use std::path::Path;

/// The real, local filesystem
///
/// Symlinks are never followed when deleting: a link is removed, not its
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_empty_dir(&self, path: &Path) -> Result<bool, FsError> {
        let meta = fs::metadata(path).map_err(|e| FsError::from_io(path, e))?;
        if !meta.is_dir() {
            return Err(FsError::NotADirectory(path.to_path_buf()));
        }
        let mut children = fs::read_dir(path).map_err(|e| FsError::from_io(path, e))?;
        Ok(children.next().is_none())
    }

    fn delete_file(&self, path: &Path) -> Result<(), FsError> {
        fs::remove_file(path).map_err(|e| FsError::from_io(path, e))
    }

    fn remove_empty_dir(&self, path: &Path) -> Result<(), FsError> {
        fs::remove_dir(path).map_err(|e| FsError::from_io(path, e))
    }

    fn delete_recursively(&self, path: &Path) -> bool {
        let Ok(meta) = fs::symlink_metadata(path) else {
            return false;
        };
        let result = if meta.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        if let Err(e) = &result {
            tracing::warn!(path = %path.display(), error = %e, "recursive delete incomplete");
        }
        result.is_ok()
    }

    fn delete_dir_contents(&self, path: &Path) -> Result<(), FsError> {
        let entries = fs::read_dir(path).map_err(|e| FsError::from_io(path, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| FsError::from_io(path, e))?;
            let child = entry.path();
            let file_type = entry.file_type().map_err(|e| FsError::from_io(&child, e))?;
            let result = if file_type.is_dir() {
                fs::remove_dir_all(&child)
            } else {
                fs::remove_file(&child)
            };
            result.map_err(|e| FsError::from_io(&child, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "local_fs_tests.rs"]
mod tests;
