// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task scheduler backed by the tokio runtime
//!
//! Each armed job gets its own timer task. Jobs run on the blocking pool
//! and a repeating job's next tick waits for the previous run to finish.

use chrono::{DateTime, Utc};
use fp_core::{Cancellable, PurgeJob, ScheduledHandle, TaskScheduler, TimerError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;

/// Schedules purge jobs as tokio tasks
#[derive(Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    /// Scheduler on the runtime the caller is running in
    pub fn current() -> Result<Self, TimerError> {
        Handle::try_current()
            .map(Self::with_runtime)
            .map_err(|e| TimerError::NoRuntime(e.to_string()))
    }

    pub fn with_runtime(runtime: Handle) -> Self {
        Self { runtime }
    }

    fn spawn<Fut>(
        &self,
        timer: impl FnOnce(watch::Receiver<bool>, Arc<AtomicBool>) -> Fut,
    ) -> ScheduledHandle
    where
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let finished = Arc::new(AtomicBool::new(false));
        let task = self.runtime.spawn(timer(cancel_rx, Arc::clone(&finished)));
        Box::new(TokioHandle {
            cancel_tx,
            finished,
            abort: task.abort_handle(),
        })
    }
}

impl TaskScheduler for TokioScheduler {
    fn schedule_once(
        &self,
        job: Arc<dyn PurgeJob>,
        at: DateTime<Utc>,
    ) -> Result<ScheduledHandle, TimerError> {
        let delay = (at - Utc::now()).to_std().unwrap_or_default();
        tracing::debug!(request = %job.request(), delay_ms = delay.as_millis() as u64, "arming once");

        Ok(self.spawn(move |mut cancel, finished| async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.changed() => return,
            }
            run_job(job).await;
            finished.store(true, Ordering::SeqCst);
        }))
    }

    fn schedule_repeating(
        &self,
        job: Arc<dyn PurgeJob>,
        interval: Duration,
    ) -> Result<ScheduledHandle, TimerError> {
        if interval.is_zero() {
            return Err(TimerError::InvalidInterval);
        }
        tracing::debug!(request = %job.request(), interval_ms = interval.as_millis() as u64, "arming repeating");

        Ok(self.spawn(move |mut cancel, finished| async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = cancel.changed() => return,
                }
                if !run_job(Arc::clone(&job)).await {
                    break;
                }
                if *cancel.borrow() {
                    return;
                }
            }
            finished.store(true, Ordering::SeqCst);
        }))
    }
}

/// Run one invocation on the blocking pool; false if it errored
async fn run_job(job: Arc<dyn PurgeJob>) -> bool {
    let runner = Arc::clone(&job);
    match tokio::task::spawn_blocking(move || runner.run()).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::error!(request = %job.request(), error = %e, "purge job failed");
            false
        }
        Err(e) => {
            tracing::error!(request = %job.request(), error = %e, "purge job panicked");
            false
        }
    }
}

struct TokioHandle {
    /// Dropping the sender also stops the timer task
    cancel_tx: watch::Sender<bool>,
    finished: Arc<AtomicBool>,
    abort: AbortHandle,
}

impl Cancellable for TokioHandle {
    fn cancel(&self, interrupt_if_running: bool) -> bool {
        if self.finished.load(Ordering::SeqCst) || self.cancel_tx.send_replace(true) {
            return false;
        }
        if interrupt_if_running {
            self.abort.abort();
        }
        true
    }

    fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }

    fn is_done(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "tokio_scheduler_tests.rs"]
mod tests;
