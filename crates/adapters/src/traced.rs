// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use fp_core::{FileSystem, FsError};
use std::path::Path;
use std::time::Instant;

/// Wrapper that adds tracing to any FileSystem
#[derive(Clone)]
pub struct TracedFileSystem<F> {
    inner: F,
}

impl<F> TracedFileSystem<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

fn log_mutation(result: &Result<(), FsError>, start: Instant, done: &str) {
    let elapsed_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(()) => tracing::info!(elapsed_ms, "{done}"),
        Err(e) => tracing::error!(elapsed_ms, error = %e, "{done} failed"),
    }
}

impl<F: FileSystem> FileSystem for TracedFileSystem<F> {
    fn exists(&self, path: &Path) -> bool {
        let exists = self.inner.exists(path);
        tracing::trace!(path = %path.display(), exists, "probed");
        exists
    }

    fn is_dir(&self, path: &Path) -> bool {
        let is_dir = self.inner.is_dir(path);
        tracing::trace!(path = %path.display(), is_dir, "probed");
        is_dir
    }

    fn is_file(&self, path: &Path) -> bool {
        let is_file = self.inner.is_file(path);
        tracing::trace!(path = %path.display(), is_file, "probed");
        is_file
    }

    fn is_empty_dir(&self, path: &Path) -> Result<bool, FsError> {
        let result = self.inner.is_empty_dir(path);
        tracing::trace!(path = %path.display(), empty = ?result.as_ref().ok(), "checked");
        result
    }

    fn delete_file(&self, path: &Path) -> Result<(), FsError> {
        let span = tracing::info_span!("fs.delete_file", path = %path.display());
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.inner.delete_file(path);
        log_mutation(&result, start, "file deleted");
        result
    }

    fn remove_empty_dir(&self, path: &Path) -> Result<(), FsError> {
        let span = tracing::info_span!("fs.remove_empty_dir", path = %path.display());
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.inner.remove_empty_dir(path);
        log_mutation(&result, start, "directory removed");
        result
    }

    fn delete_recursively(&self, path: &Path) -> bool {
        let span = tracing::info_span!("fs.delete_recursively", path = %path.display());
        let _guard = span.enter();

        tracing::info!("starting");
        let start = Instant::now();
        let deleted = self.inner.delete_recursively(path);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if deleted {
            tracing::info!(elapsed_ms, "tree deleted");
        } else {
            tracing::error!(elapsed_ms, "tree not fully deleted");
        }
        deleted
    }

    fn delete_dir_contents(&self, path: &Path) -> Result<(), FsError> {
        let span = tracing::info_span!("fs.delete_dir_contents", path = %path.display());
        let _guard = span.enter();

        // Precondition: path must be a directory
        if !self.inner.is_dir(path) {
            tracing::error!("not a directory");
            return Err(FsError::NotADirectory(path.to_path_buf()));
        }

        let start = Instant::now();
        let result = self.inner.delete_dir_contents(path);
        log_mutation(&result, start, "contents deleted");
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
