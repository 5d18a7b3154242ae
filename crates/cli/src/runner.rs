// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule requests on a real purger and wait for every outcome

use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use fp_adapters::{LocalFileSystem, TokioScheduler, TracedFileSystem};
use fp_core::{
    EventBus, EventPattern, EventReceiver, PurgeEvent, PurgeOutcome, PurgeRequest, Purger,
    PurgerConfig, PurgerDeps, Subscription, SystemClock,
};
use serde::Serialize;
use std::fmt;
use std::process::ExitCode;

/// Tally of a run
#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub purged: usize,
    pub failed: usize,
    /// Requests refused at scheduling time
    pub rejected: usize,
    pub unscheduled: usize,
    pub interrupted: bool,
}

impl Summary {
    /// 130 when interrupted, 1 when any purge failed or was rejected
    pub fn status(&self) -> u8 {
        if self.interrupted {
            130
        } else if self.failed > 0 || self.rejected > 0 {
            1
        } else {
            0
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status())
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} purged, {} failed, {} rejected",
            self.purged, self.failed, self.rejected
        )?;
        if self.interrupted {
            write!(f, ", {} unscheduled (interrupted)", self.unscheduled)?;
        }
        Ok(())
    }
}

fn report_failure(event: &PurgeEvent) {
    eprintln!("error: {event}");
}

fn drain(events: &mut EventReceiver, failures: &mut EventReceiver, format: OutputFormat) {
    while let Ok(event) = events.try_recv() {
        output::print_event(&event, format);
    }
    while let Ok(event) = failures.try_recv() {
        report_failure(&event);
    }
}

/// Schedule `requests`, print events as they happen and wait for all of
/// them to finish. Ctrl-C unschedules whatever is still pending.
pub async fn run(
    requests: Vec<PurgeRequest>,
    config: &PurgerConfig,
    format: OutputFormat,
) -> Result<Summary> {
    let bus = EventBus::new();
    let mut events = bus.set_global_handler();
    let failures_sub = Subscription::new("cli-failures", vec![EventPattern::new("purge:failed")]);
    let failures_id = failures_sub.id.clone();
    let mut failures = bus.subscribe(failures_sub);
    let purger = Purger::new(PurgerDeps {
        fs: TracedFileSystem::new(LocalFileSystem::new()),
        clock: SystemClock,
        publisher: bus.clone(),
        scheduler: TokioScheduler::current()?,
    });

    let mut summary = Summary::default();
    let mut completions = Vec::with_capacity(requests.len());
    for request in requests {
        match purger.schedule(request) {
            Ok(completion) => completions.push(completion),
            Err(e) => {
                tracing::error!(error = %e, "purge rejected");
                eprintln!("error: {e}");
                summary.rejected += 1;
            }
        }
    }

    let mut waiter = tokio::spawn(async move {
        let mut outcomes = Vec::with_capacity(completions.len());
        for completion in completions {
            outcomes.push(completion.wait().await);
        }
        outcomes
    });
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    let outcomes = loop {
        tokio::select! {
            Some(event) = events.recv() => output::print_event(&event, format),
            Some(event) = failures.recv() => report_failure(&event),
            joined = &mut waiter => break joined.context("waiting for purges")?,
            signal = &mut interrupt => {
                signal.context("listening for ctrl-c")?;
                summary.unscheduled = purger.unschedule_all(config.interrupt_on_unschedule);
                summary.interrupted = true;
                tracing::warn!(unscheduled = summary.unscheduled, "interrupted");
                drain(&mut events, &mut failures, format);
                bus.unsubscribe(&failures_id);
                return Ok(summary);
            }
        }
    };
    drain(&mut events, &mut failures, format);
    bus.unsubscribe(&failures_id);

    for done in outcomes.into_iter().flatten() {
        match done.outcome {
            PurgeOutcome::Purged => summary.purged += 1,
            PurgeOutcome::Failed { .. } => summary.failed += 1,
        }
    }
    Ok(summary)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
