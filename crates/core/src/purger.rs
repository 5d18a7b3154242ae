// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The purge registry
//!
//! [`Purger`] owns the set of in-flight purges and guarantees at most one
//! active purge per path. Entries leave the registry either through
//! [`Purger::unschedule`] or when their task completes; the completion hook
//! only removes the exact entry it was registered for.
//!
//! A path is reserved under the registry lock before its handler runs and
//! armed afterwards, so handlers and event observers run without the lock
//! held and may query the registry.

use crate::clock::Clock;
use crate::completion::{Completion, CompletionSignal};
use crate::error::PurgeError;
use crate::event::PurgeEvent;
use crate::events::EventPublisher;
use crate::fs::FileSystem;
use crate::handler::HandlerSet;
use crate::request::PurgeRequest;
use crate::timer::{ScheduledHandle, TaskScheduler};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Collaborators needed to build a [`Purger`] with the standard handlers
pub struct PurgerDeps<F, C, P, S> {
    pub fs: F,
    pub clock: C,
    pub publisher: P,
    pub scheduler: S,
}

struct ActiveEntry {
    /// Generation number identifying this exact handle
    id: u64,
    /// `None` while the handler is still arming the purge
    handle: Option<ScheduledHandle>,
}

#[derive(Default)]
struct Entries {
    next_id: u64,
    active: HashMap<PurgeRequest, ActiveEntry>,
}

impl Entries {
    fn lookup(&self, path: &Path) -> Option<&PurgeRequest> {
        self.active.keys().find(|request| request.path() == path)
    }

    /// Claim the path of `request` before its handler runs
    fn reserve(&mut self, request: PurgeRequest) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.active.insert(request, ActiveEntry { id, handle: None });
        id
    }

    /// Attach `handle` to reservation `id`.
    ///
    /// Hands the handle back if the reservation is gone (unscheduled while
    /// arming).
    fn arm(
        &mut self,
        request: &PurgeRequest,
        id: u64,
        handle: ScheduledHandle,
    ) -> Option<ScheduledHandle> {
        match self.active.get_mut(request) {
            Some(entry) if entry.id == id => {
                entry.handle = Some(handle);
                None
            }
            _ => Some(handle),
        }
    }

    fn remove_path(&mut self, path: &Path) -> Option<(PurgeRequest, ActiveEntry)> {
        let request = self.lookup(path)?.clone();
        self.active.remove_entry(&request)
    }

    /// Remove `request` only if its stored entry is still generation `id`
    fn remove_if_current(&mut self, request: &PurgeRequest, id: u64) -> Option<ActiveEntry> {
        match self.active.get(request) {
            Some(entry) if entry.id == id => self.active.remove(request),
            _ => None,
        }
    }
}

/// Registry of scheduled purges, at most one per path
pub struct Purger<S, P> {
    entries: Arc<Mutex<Entries>>,
    handlers: HandlerSet,
    scheduler: S,
    publisher: P,
}

impl<S: TaskScheduler, P: EventPublisher> Purger<S, P> {
    /// Registry dispatching to the built-in handlers
    pub fn new<F: FileSystem, C: Clock>(deps: PurgerDeps<F, C, P, S>) -> Self {
        let handlers = HandlerSet::standard(deps.fs, deps.clock, deps.publisher.clone());
        Self::with_handlers(handlers, deps.scheduler, deps.publisher)
    }

    pub fn with_handlers(handlers: HandlerSet, scheduler: S, publisher: P) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Entries::default())),
            handlers,
            scheduler,
            publisher,
        }
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Schedule a purge.
    ///
    /// Fails with `AlreadyScheduled` if a purge for the same path is active,
    /// or `SchedulingFailed` if no handler could arm it. The returned
    /// [`Completion`] may be awaited or dropped.
    pub fn schedule(&self, request: impl Into<PurgeRequest>) -> Result<Completion, PurgeError> {
        let request = request.into();
        tracing::debug!(%request, "schedule requested");

        let id = {
            let mut entries = self.entries();
            if entries.lookup(request.path()).is_some() {
                tracing::warn!(path = %request.path().display(), "purge already scheduled");
                return Err(PurgeError::AlreadyScheduled {
                    path: request.path().to_path_buf(),
                });
            }
            entries.reserve(request.clone())
        };

        let (signal, completion) = CompletionSignal::new();
        let handle = match self
            .handlers
            .dispatch(&request, signal.clone(), &self.scheduler)
        {
            Ok(handle) => handle,
            Err(e) => {
                self.entries().remove_if_current(&request, id);
                tracing::warn!(error = %e, %request, "purge could not be scheduled");
                return Err(match e {
                    PurgeError::SchedulingFailed { .. } => e,
                    other => PurgeError::scheduling_failed(&request, other.to_string()),
                });
            }
        };

        let unclaimed = self.entries().arm(&request, id, handle);
        if let Some(handle) = unclaimed {
            tracing::debug!(%request, id, "purge unscheduled while arming");
            handle.cancel(false);
        }

        let entries = Arc::downgrade(&self.entries);
        signal.on_complete(move |done| release(&entries, &done.request, id));
        Ok(completion)
    }

    /// Cancel the purge for `path` and publish `Unscheduled`.
    ///
    /// `interrupt_if_running` is passed on to the timer handle.
    pub fn unschedule(
        &self,
        path: impl AsRef<Path>,
        interrupt_if_running: bool,
    ) -> Result<bool, PurgeError> {
        let path = path.as_ref();
        let removed = self.entries().remove_path(path);
        let Some((request, entry)) = removed else {
            tracing::warn!(path = %path.display(), "no purge scheduled");
            return Err(PurgeError::NotScheduled {
                path: path.to_path_buf(),
            });
        };

        self.cancel(request, entry, interrupt_if_running);
        Ok(true)
    }

    /// Cancel every active purge, returning how many were cancelled
    pub fn unschedule_all(&self, interrupt_if_running: bool) -> usize {
        let drained: Vec<_> = self.entries().active.drain().collect();
        let count = drained.len();
        for (request, entry) in drained {
            self.cancel(request, entry, interrupt_if_running);
        }
        count
    }

    fn cancel(&self, request: PurgeRequest, entry: ActiveEntry, interrupt_if_running: bool) {
        let disarmed = entry
            .handle
            .is_some_and(|handle| handle.cancel(interrupt_if_running));
        tracing::info!(%request, disarmed, "purge unscheduled");
        self.publisher.publish(PurgeEvent::Unscheduled { request });
    }

    pub fn is_scheduled(&self, path: impl AsRef<Path>) -> bool {
        self.entries().lookup(path.as_ref()).is_some()
    }

    /// Snapshot of the active requests
    pub fn scheduled(&self) -> Vec<PurgeRequest> {
        self.entries().active.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries().active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().active.is_empty()
    }
}

/// Completion hook: drop the finished entry and disarm its timer
fn release(entries: &Weak<Mutex<Entries>>, request: &PurgeRequest, id: u64) {
    let Some(entries) = entries.upgrade() else {
        return;
    };
    let removed = entries
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .remove_if_current(request, id);
    match removed {
        Some(entry) => {
            tracing::debug!(%request, id, "completed purge released");
            if let Some(handle) = entry.handle {
                handle.cancel(false);
            }
        }
        None => tracing::debug!(%request, id, "completed purge already released"),
    }
}

#[cfg(test)]
#[path = "purger_tests.rs"]
mod tests;
