// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-assignment completion signal between a purge task and its observers
//!
//! The task side ([`CompletionSignal`]) is fulfilled at most once. The
//! registry attaches a hook to it; callers get a [`Completion`] they may
//! await or ignore.

use crate::request::PurgeRequest;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// How a purge ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeOutcome {
    Purged,
    Failed { reason: String },
}

/// Value a completion signal is fulfilled with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    pub request: PurgeRequest,
    pub outcome: PurgeOutcome,
}

type Hook = Box<dyn FnOnce(&Completed) + Send>;

#[derive(Default)]
struct SignalState {
    value: Option<Completed>,
    hook: Option<Hook>,
}

struct SignalInner {
    state: Mutex<SignalState>,
    tx: watch::Sender<Option<Completed>>,
}

/// Task side of a completion: fulfilled once when the purge finishes
#[derive(Clone)]
pub struct CompletionSignal {
    inner: Arc<SignalInner>,
}

impl CompletionSignal {
    /// Create a signal and the caller-facing completion observing it
    pub fn new() -> (Self, Completion) {
        let (tx, rx) = watch::channel(None);
        let signal = Self {
            inner: Arc::new(SignalInner {
                state: Mutex::new(SignalState::default()),
                tx,
            }),
        };
        (signal, Completion { rx })
    }

    /// Fulfil the signal, running the registered hook.
    ///
    /// Returns false (and does nothing) if the signal was already fulfilled.
    pub fn complete(&self, completed: Completed) -> bool {
        let hook = {
            let mut state = self.inner.state.lock().unwrap_or_else(|e| e.into_inner());
            if state.value.is_some() {
                return false;
            }
            state.value = Some(completed.clone());
            state.hook.take()
        };

        self.inner.tx.send_replace(Some(completed.clone()));
        if let Some(hook) = hook {
            hook(&completed);
        }
        true
    }

    pub fn is_complete(&self) -> bool {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .value
            .is_some()
    }

    /// Register the hook run on fulfilment.
    ///
    /// If the signal is already fulfilled the hook runs immediately on the
    /// calling thread. Only one hook is kept; a later registration replaces
    /// a pending one.
    pub fn on_complete(&self, hook: impl FnOnce(&Completed) + Send + 'static) {
        let done = {
            let mut state = self.inner.state.lock().unwrap_or_else(|e| e.into_inner());
            match &state.value {
                Some(value) => value.clone(),
                None => {
                    state.hook = Some(Box::new(hook));
                    return;
                }
            }
        };
        hook(&done);
    }
}

/// Caller side of a completion
pub struct Completion {
    rx: watch::Receiver<Option<Completed>>,
}

impl Completion {
    /// Wait for the purge to finish.
    ///
    /// Resolves to `None` when the purge was unscheduled and its task
    /// released without ever completing.
    pub async fn wait(mut self) -> Option<Completed> {
        match self.rx.wait_for(Option::is_some).await {
            Ok(value) => value.clone(),
            Err(_) => None,
        }
    }

    /// The completion value, if the purge has already finished
    pub fn try_get(&self) -> Option<Completed> {
        self.rx.borrow().clone()
    }
}

#[cfg(test)]
#[path = "completion_tests.rs"]
mod tests;
