// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock-driven scheduler that fires jobs only when polled
//!
//! Nothing runs in the background: `poll` runs every job due at the clock's
//! current time on the calling thread. Used for deterministic tests and for
//! embedding the engine in an existing event loop.

use super::{offset, Cancellable, JobRun, PurgeJob, ScheduledHandle, TaskScheduler, TimerError};
use crate::clock::Clock;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

#[derive(Default)]
struct Flags {
    cancelled: AtomicBool,
    done: AtomicBool,
}

struct Item {
    seq: u64,
    fire_at: DateTime<Utc>,
    repeat: Option<Duration>,
    job: Arc<dyn PurgeJob>,
    flags: Arc<Flags>,
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl Eq for Item {}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Item {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Min-heap: earliest first, then in arming order
        Reverse((self.fire_at, self.seq)).cmp(&Reverse((other.fire_at, other.seq)))
    }
}

#[derive(Default)]
struct State {
    items: BinaryHeap<Item>,
    next_seq: u64,
    shut_down: bool,
}

impl State {
    fn push(
        &mut self,
        fire_at: DateTime<Utc>,
        repeat: Option<Duration>,
        job: Arc<dyn PurgeJob>,
        flags: Arc<Flags>,
    ) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.items.push(Item {
            seq,
            fire_at,
            repeat,
            job,
            flags,
        });
    }
}

struct ManualHandle {
    flags: Arc<Flags>,
    state: Weak<Mutex<State>>,
}

impl Cancellable for ManualHandle {
    /// Cancelled jobs leave the queue immediately, releasing the job
    fn cancel(&self, _interrupt_if_running: bool) -> bool {
        // Jobs run on the polling thread, so there is nothing to interrupt
        if self.flags.done.load(Ordering::SeqCst)
            || self.flags.cancelled.swap(true, Ordering::SeqCst)
        {
            return false;
        }
        if let Some(state) = self.state.upgrade() {
            state
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .items
                .retain(|item| !Arc::ptr_eq(&item.flags, &self.flags));
        }
        true
    }

    fn is_cancelled(&self) -> bool {
        self.flags.cancelled.load(Ordering::SeqCst)
    }

    fn is_done(&self) -> bool {
        self.flags.done.load(Ordering::SeqCst)
    }
}

/// Scheduler driven by explicit `poll` calls against a [`Clock`]
#[derive(Clone)]
pub struct ManualScheduler<C> {
    clock: C,
    state: Arc<Mutex<State>>,
}

impl<C: Clock> ManualScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run every job due at the clock's current time.
    ///
    /// Each due job runs at most once per poll, outside the scheduler lock.
    /// Repeating jobs are re-armed one interval after their previous fire
    /// time unless they failed or were cancelled meanwhile.
    pub fn poll(&self) -> Vec<JobRun> {
        let now = self.clock.now();
        let due = {
            let mut state = self.state();
            let mut due = Vec::new();
            while let Some(item) = state.items.peek() {
                if item.fire_at > now {
                    break;
                }
                let Some(item) = state.items.pop() else {
                    break;
                };
                if !item.flags.cancelled.load(Ordering::SeqCst) {
                    due.push(item);
                }
            }
            due
        };

        let mut runs = Vec::with_capacity(due.len());
        for item in due {
            // An earlier job in this batch may have cancelled this one
            if item.flags.cancelled.load(Ordering::SeqCst) {
                continue;
            }

            let result = item.job.run();
            let failed = result.is_err();
            if let Err(e) = &result {
                tracing::warn!(error = %e, "scheduled job failed");
            }
            runs.push(JobRun {
                request: item.job.request().clone(),
                result,
            });

            let next = item
                .repeat
                .filter(|_| !failed && !item.flags.cancelled.load(Ordering::SeqCst))
                .and_then(|interval| offset(item.fire_at, interval).map(|at| (at, interval)));
            match next {
                Some((fire_at, interval)) => {
                    self.state()
                        .push(fire_at, Some(interval), item.job, item.flags);
                }
                None => item.flags.done.store(true, Ordering::SeqCst),
            }
        }
        runs
    }

    /// Number of armed, uncancelled jobs
    pub fn pending(&self) -> usize {
        self.state()
            .items
            .iter()
            .filter(|item| !item.flags.cancelled.load(Ordering::SeqCst))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// Get the next fire time, if any
    pub fn next_fire_time(&self) -> Option<DateTime<Utc>> {
        self.state()
            .items
            .iter()
            .filter(|item| !item.flags.cancelled.load(Ordering::SeqCst))
            .map(|item| item.fire_at)
            .min()
    }

    /// Drop every armed job and refuse new ones
    pub fn shutdown(&self) {
        let mut state = self.state();
        state.shut_down = true;
        for item in state.items.drain() {
            item.flags.done.store(true, Ordering::SeqCst);
        }
    }

    fn arm(
        &self,
        job: Arc<dyn PurgeJob>,
        fire_at: DateTime<Utc>,
        repeat: Option<Duration>,
    ) -> Result<ScheduledHandle, TimerError> {
        let mut state = self.state();
        if state.shut_down {
            return Err(TimerError::ShutDown);
        }
        let flags = Arc::new(Flags::default());
        state.push(fire_at, repeat, job, Arc::clone(&flags));
        Ok(Box::new(ManualHandle {
            flags,
            state: Arc::downgrade(&self.state),
        }))
    }
}

impl<C: Clock> TaskScheduler for ManualScheduler<C> {
    fn schedule_once(
        &self,
        job: Arc<dyn PurgeJob>,
        at: DateTime<Utc>,
    ) -> Result<ScheduledHandle, TimerError> {
        self.arm(job, at, None)
    }

    fn schedule_repeating(
        &self,
        job: Arc<dyn PurgeJob>,
        interval: Duration,
    ) -> Result<ScheduledHandle, TimerError> {
        if interval.is_zero() {
            return Err(TimerError::InvalidInterval);
        }
        self.arm(job, self.clock.now(), Some(interval))
    }
}

#[cfg(test)]
#[path = "manual_tests.rs"]
mod tests;
