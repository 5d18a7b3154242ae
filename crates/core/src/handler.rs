// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule handlers: arm the right kind of timer for each request variant

use crate::clock::Clock;
use crate::completion::CompletionSignal;
use crate::error::PurgeError;
use crate::event::PurgeEvent;
use crate::events::EventPublisher;
use crate::fs::FileSystem;
use crate::request::PurgeRequest;
use crate::task::{PurgeWhenEmptyTask, ScheduledPurgeTask};
use crate::timer::{PurgeJob, ScheduledHandle, TaskScheduler};
use std::sync::Arc;

/// Arms a purge task for the request variants it supports
pub trait ScheduleHandler: Send + Sync {
    fn handles(&self, request: &PurgeRequest) -> bool;

    /// Build the task, arm it on `scheduler` and publish `Scheduled`.
    ///
    /// The `Scheduled` event is published before this returns.
    fn schedule(
        &self,
        request: &PurgeRequest,
        signal: CompletionSignal,
        scheduler: &dyn TaskScheduler,
    ) -> Result<ScheduledHandle, PurgeError>;
}

fn publish_scheduled(publisher: &impl EventPublisher, request: &PurgeRequest) {
    publisher.publish(PurgeEvent::Scheduled {
        request: request.clone(),
    });
}

/// Handles [`PurgeRequest::Scheduled`]: one shot at `execute_at`
#[derive(Clone)]
pub struct ScheduledPurgeHandler<F, P> {
    fs: F,
    publisher: P,
}

impl<F, P> ScheduledPurgeHandler<F, P> {
    pub fn new(fs: F, publisher: P) -> Self {
        Self { fs, publisher }
    }
}

impl<F: FileSystem, P: EventPublisher> ScheduleHandler for ScheduledPurgeHandler<F, P> {
    fn handles(&self, request: &PurgeRequest) -> bool {
        match request {
            PurgeRequest::Scheduled(_) => true,
            PurgeRequest::WhenEmpty(_) => false,
        }
    }

    fn schedule(
        &self,
        request: &PurgeRequest,
        signal: CompletionSignal,
        scheduler: &dyn TaskScheduler,
    ) -> Result<ScheduledHandle, PurgeError> {
        let purge = match request {
            PurgeRequest::Scheduled(purge) => purge.clone(),
            PurgeRequest::WhenEmpty(_) => {
                return Err(PurgeError::unsupported(request, "not a scheduled purge"))
            }
        };

        let execute_at = purge.execute_at();
        let task = ScheduledPurgeTask::new(purge, signal, self.fs.clone(), self.publisher.clone());
        let handle = scheduler
            .schedule_once(Arc::new(task) as Arc<dyn PurgeJob>, execute_at)
            .map_err(|e| PurgeError::scheduling_failed(request, e.to_string()))?;

        tracing::info!(%request, at = %execute_at.to_rfc3339(), "purge scheduled");
        publish_scheduled(&self.publisher, request);
        Ok(handle)
    }
}

/// Handles [`PurgeRequest::WhenEmpty`]: polls every `poll_interval`
#[derive(Clone)]
pub struct PurgeWhenEmptyHandler<F, C, P> {
    fs: F,
    clock: C,
    publisher: P,
}

impl<F, C, P> PurgeWhenEmptyHandler<F, C, P> {
    pub fn new(fs: F, clock: C, publisher: P) -> Self {
        Self {
            fs,
            clock,
            publisher,
        }
    }
}

impl<F: FileSystem, C: Clock, P: EventPublisher> ScheduleHandler
    for PurgeWhenEmptyHandler<F, C, P>
{
    fn handles(&self, request: &PurgeRequest) -> bool {
        match request {
            PurgeRequest::WhenEmpty(_) => true,
            PurgeRequest::Scheduled(_) => false,
        }
    }

    fn schedule(
        &self,
        request: &PurgeRequest,
        signal: CompletionSignal,
        scheduler: &dyn TaskScheduler,
    ) -> Result<ScheduledHandle, PurgeError> {
        let purge = match request {
            PurgeRequest::WhenEmpty(purge) => purge.clone(),
            PurgeRequest::Scheduled(_) => {
                return Err(PurgeError::unsupported(request, "not a purge-when-empty request"))
            }
        };

        let interval = purge.poll_interval();
        let task = PurgeWhenEmptyTask::new(
            purge,
            signal,
            self.fs.clone(),
            self.clock.clone(),
            self.publisher.clone(),
        );
        let handle = scheduler
            .schedule_repeating(Arc::new(task) as Arc<dyn PurgeJob>, interval)
            .map_err(|e| PurgeError::scheduling_failed(request, e.to_string()))?;

        tracing::info!(
            %request,
            poll = %humantime::format_duration(interval),
            "purge when empty scheduled"
        );
        publish_scheduled(&self.publisher, request);
        Ok(handle)
    }
}

/// Flat collection of handlers; exactly one must claim each request
#[derive(Default)]
pub struct HandlerSet {
    handlers: Vec<Box<dyn ScheduleHandler>>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The handlers for every built-in request variant
    pub fn standard<F, C, P>(fs: F, clock: C, publisher: P) -> Self
    where
        F: FileSystem,
        C: Clock,
        P: EventPublisher,
    {
        Self::new()
            .with(ScheduledPurgeHandler::new(fs.clone(), publisher.clone()))
            .with(PurgeWhenEmptyHandler::new(fs, clock, publisher))
    }

    pub fn with(mut self, handler: impl ScheduleHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Hand `request` to the single handler that claims it
    pub fn dispatch(
        &self,
        request: &PurgeRequest,
        signal: CompletionSignal,
        scheduler: &dyn TaskScheduler,
    ) -> Result<ScheduledHandle, PurgeError> {
        let mut matching = self.handlers.iter().filter(|h| h.handles(request));
        match (matching.next(), matching.next()) {
            (Some(handler), None) => handler.schedule(request, signal, scheduler),
            (None, _) => Err(PurgeError::unsupported(request, "no handler")),
            (Some(_), Some(_)) => Err(PurgeError::unsupported(
                request,
                "ambiguous: more than one handler matches",
            )),
        }
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
