// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory filesystem for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{FileSystem, FsError};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    File,
    Dir,
    /// Neither a file nor a directory (socket, fifo, device)
    Special,
}

/// Recorded mutating call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsCall {
    DeleteFile(PathBuf),
    RemoveEmptyDir(PathBuf),
    DeleteRecursively(PathBuf),
    DeleteDirContents(PathBuf),
}

#[derive(Default)]
struct FakeState {
    nodes: BTreeMap<PathBuf, Node>,
    denied: HashSet<PathBuf>,
    stuck: HashSet<PathBuf>,
    calls: Vec<FsCall>,
}

impl FakeState {
    fn insert_with_parents(&mut self, path: &Path, node: Node) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.nodes.insert(ancestor.to_path_buf(), Node::Dir);
        }
        self.nodes.insert(path.to_path_buf(), node);
    }

    fn has_children(&self, path: &Path) -> bool {
        self.nodes.keys().any(|k| k.parent() == Some(path))
    }

    fn remove_below(&mut self, path: &Path) {
        self.nodes.retain(|k, _| k == path || !k.starts_with(path));
    }

    fn check_denied(&self, path: &Path) -> Result<(), FsError> {
        if self.denied.contains(path) {
            return Err(FsError::PermissionDenied {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            });
        }
        Ok(())
    }
}

/// Fake filesystem holding a tree of files and directories in memory
#[derive(Clone, Default)]
pub struct FakeFileSystem {
    state: Arc<Mutex<FakeState>>,
}

impl FakeFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a file, creating any missing parent directories
    pub fn add_file(&self, path: impl AsRef<Path>) {
        self.state().insert_with_parents(path.as_ref(), Node::File);
    }

    /// Add a directory, creating any missing parent directories
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.state().insert_with_parents(path.as_ref(), Node::Dir);
    }

    /// Add an entry that exists but is neither a file nor a directory
    pub fn add_special(&self, path: impl AsRef<Path>) {
        self.state().insert_with_parents(path.as_ref(), Node::Special);
    }

    /// Make every mutating operation on `path` fail with a permission error
    pub fn deny(&self, path: impl AsRef<Path>) {
        self.state().denied.insert(path.as_ref().to_path_buf());
    }

    /// Make recursive deletes of `path` report failure without deleting
    pub fn fail_recursive_delete(&self, path: impl AsRef<Path>) {
        self.state().stuck.insert(path.as_ref().to_path_buf());
    }

    /// Get all recorded mutating calls
    pub fn calls(&self) -> Vec<FsCall> {
        self.state().calls.clone()
    }

    /// Number of entries strictly below `path`
    pub fn descendant_count(&self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        self.state()
            .nodes
            .keys()
            .filter(|k| *k != path && k.starts_with(path))
            .count()
    }
}

impl FileSystem for FakeFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.state().nodes.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.state().nodes.get(path) == Some(&Node::Dir)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.state().nodes.get(path) == Some(&Node::File)
    }

    fn is_empty_dir(&self, path: &Path) -> Result<bool, FsError> {
        let state = self.state();
        match state.nodes.get(path) {
            None => Err(FsError::NotFound(path.to_path_buf())),
            Some(Node::File | Node::Special) => Err(FsError::NotADirectory(path.to_path_buf())),
            Some(Node::Dir) => Ok(!state.has_children(path)),
        }
    }

    fn delete_file(&self, path: &Path) -> Result<(), FsError> {
        let mut state = self.state();
        state.calls.push(FsCall::DeleteFile(path.to_path_buf()));
        state.check_denied(path)?;
        match state.nodes.get(path) {
            None => Err(FsError::NotFound(path.to_path_buf())),
            Some(Node::Dir) => Err(FsError::Io(std::io::Error::other(format!(
                "is a directory: {}",
                path.display()
            )))),
            Some(Node::File | Node::Special) => {
                state.nodes.remove(path);
                Ok(())
            }
        }
    }

    fn remove_empty_dir(&self, path: &Path) -> Result<(), FsError> {
        let mut state = self.state();
        state.calls.push(FsCall::RemoveEmptyDir(path.to_path_buf()));
        state.check_denied(path)?;
        match state.nodes.get(path) {
            None => Err(FsError::NotFound(path.to_path_buf())),
            Some(Node::File | Node::Special) => {
                Err(FsError::NotADirectory(path.to_path_buf()))
            }
            Some(Node::Dir) if state.has_children(path) => Err(FsError::Io(
                std::io::Error::other(format!("directory not empty: {}", path.display())),
            )),
            Some(Node::Dir) => {
                state.nodes.remove(path);
                Ok(())
            }
        }
    }

    fn delete_recursively(&self, path: &Path) -> bool {
        let mut state = self.state();
        state.calls.push(FsCall::DeleteRecursively(path.to_path_buf()));
        if !state.nodes.contains_key(path)
            || state.denied.contains(path)
            || state.stuck.contains(path)
        {
            return false;
        }
        state.remove_below(path);
        state.nodes.remove(path);
        true
    }

    fn delete_dir_contents(&self, path: &Path) -> Result<(), FsError> {
        let mut state = self.state();
        state.calls.push(FsCall::DeleteDirContents(path.to_path_buf()));
        state.check_denied(path)?;
        match state.nodes.get(path) {
            None => Err(FsError::NotFound(path.to_path_buf())),
            Some(Node::File | Node::Special) => {
                Err(FsError::NotADirectory(path.to_path_buf()))
            }
            Some(Node::Dir) => {
                state.remove_below(path);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
