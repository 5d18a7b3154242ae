// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem adapter trait
//!
//! The engine never touches the filesystem directly; purge tasks go through
//! this trait so the real, traced and in-memory implementations are
//! interchangeable.

#[cfg(any(test, feature = "test-support"))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeFileSystem, FsCall};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from filesystem operations
#[derive(Debug, Error)]
pub enum FsError {
    #[error("path does not exist: {0}")]
    NotFound(PathBuf),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("permission denied: {path}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl FsError {
    /// Classify an I/O error raised while operating on `path`
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied {
                path: path.to_path_buf(),
                source: err,
            },
            _ => FsError::Io(err),
        }
    }
}

/// Filesystem primitives used by purge tasks
pub trait FileSystem: Clone + Send + Sync + 'static {
    /// Check whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Check whether `path` is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Check whether `path` is a regular file
    fn is_file(&self, path: &Path) -> bool;

    /// Check whether the directory at `path` has no children.
    ///
    /// Fails with [`FsError::NotADirectory`] when `path` exists but is not a
    /// directory.
    fn is_empty_dir(&self, path: &Path) -> Result<bool, FsError>;

    /// Delete a single file
    fn delete_file(&self, path: &Path) -> Result<(), FsError>;

    /// Remove an empty directory
    fn remove_empty_dir(&self, path: &Path) -> Result<(), FsError>;

    /// Delete `path` and everything below it.
    ///
    /// Returns false when nothing was deleted or the deletion did not fully
    /// succeed.
    fn delete_recursively(&self, path: &Path) -> bool;

    /// Delete every child of the directory at `path`, keeping the directory
    fn delete_dir_contents(&self, path: &Path) -> Result<(), FsError>;
}
