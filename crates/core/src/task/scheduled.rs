// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot purge at a fixed time

use super::{delete_recursively, TaskCore};
use crate::completion::CompletionSignal;
use crate::error::PurgeError;
use crate::events::EventPublisher;
use crate::fs::FileSystem;
use crate::request::{PurgeRequest, PurgeTarget, ScheduledPurge};
use crate::timer::PurgeJob;

/// Executes a [`ScheduledPurge`] when its timer fires
pub struct ScheduledPurgeTask<F, P> {
    core: TaskCore<P>,
    fs: F,
}

impl<F: FileSystem, P: EventPublisher> ScheduledPurgeTask<F, P> {
    pub fn new(request: ScheduledPurge, signal: CompletionSignal, fs: F, publisher: P) -> Self {
        Self {
            core: TaskCore::new(request.into(), signal, publisher),
            fs,
        }
    }

    fn purge_file(&self) -> Result<(), String> {
        self.fs
            .delete_file(self.core.request.path())
            .map_err(|e| e.to_string())
    }

    fn purge_directory(&self) -> Result<(), String> {
        let path = self.core.request.path();
        match self.fs.is_empty_dir(path) {
            Ok(false) if !self.core.request.force() => {
                Err("directory not empty, not forced".to_string())
            }
            Err(e) => Err(e.to_string()),
            Ok(_) => delete_recursively(&self.fs, path),
        }
    }

    fn purge_directory_contents(&self) -> Result<(), String> {
        self.fs
            .delete_dir_contents(self.core.request.path())
            .map_err(|e| e.to_string())
    }
}

impl<F: FileSystem, P: EventPublisher> PurgeJob for ScheduledPurgeTask<F, P> {
    fn request(&self) -> &PurgeRequest {
        &self.core.request
    }

    fn run(&self) -> Result<(), PurgeError> {
        if self.core.is_finished() {
            return Ok(());
        }

        let span = tracing::info_span!("purge.scheduled", path = %self.core.request.path().display());
        let _guard = span.enter();

        if !self.core.request.exists(&self.fs) {
            return self.core.fail("file does not exist");
        }

        let result = match self.core.request.classify(&self.fs) {
            Some(PurgeTarget::File) => self.purge_file(),
            Some(PurgeTarget::DirectoryWhole) => self.purge_directory(),
            Some(PurgeTarget::DirectoryContents) => self.purge_directory_contents(),
            None => return self.core.unsupported(),
        };

        match result {
            Ok(()) => self.core.succeed(),
            Err(reason) => self.core.fail(reason),
        }
    }
}
