// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::{Clock, FakeClock};
use crate::completion::Completion;
use crate::events::{EventBus, EventReceiver};
use crate::fs::FakeFileSystem;
use crate::request::PurgeWhenEmpty;
use crate::timer::PurgeJob;
use chrono::TimeDelta;

struct Harness {
    fs: FakeFileSystem,
    clock: FakeClock,
    bus: EventBus,
    events: EventReceiver,
}

impl Harness {
    fn new() -> Self {
        let bus = EventBus::new();
        let events = bus.set_global_handler();
        Self {
            fs: FakeFileSystem::new(),
            clock: FakeClock::new(),
            bus,
            events,
        }
    }

    /// Request expiring one hour from the fake clock's current time
    fn request(&self, path: &str) -> PurgeWhenEmpty {
        PurgeWhenEmpty::new(path, self.clock.now() + TimeDelta::hours(1))
    }

    fn task(
        &self,
        request: PurgeWhenEmpty,
    ) -> (
        PurgeWhenEmptyTask<FakeFileSystem, FakeClock, EventBus>,
        Completion,
    ) {
        let (signal, completion) = CompletionSignal::new();
        let task = PurgeWhenEmptyTask::new(
            request,
            signal,
            self.fs.clone(),
            self.clock.clone(),
            self.bus.clone(),
        );
        (task, completion)
    }

    fn events(&mut self) -> Vec<PurgeEvent> {
        std::iter::from_fn(|| self.events.try_recv().ok()).collect()
    }
}

#[test]
fn missing_directory_fails() {
    let mut h = Harness::new();
    let (task, completion) = h.task(h.request("/does/not/exist"));

    let err = task.run().unwrap_err();

    assert!(matches!(err, PurgeError::PurgeFailed { ref reason, .. } if reason == "file does not exist"));
    assert!(matches!(h.events().as_slice(), [PurgeEvent::Failed { .. }]));
    assert!(completion.try_get().is_some());
}

#[test]
fn empty_directory_is_purged_on_first_tick() {
    let mut h = Harness::new();
    h.fs.add_dir("/data/inbox");
    let (task, completion) = h.task(h.request("/data/inbox"));

    task.run().unwrap();

    assert!(!h.fs.exists(Path::new("/data/inbox")));
    assert!(matches!(h.events().as_slice(), [PurgeEvent::Purged { .. }]));
    assert_eq!(completion.try_get().unwrap().outcome, PurgeOutcome::Purged);
}

#[test]
fn non_empty_unexpired_directory_waits_silently() {
    let mut h = Harness::new();
    h.fs.add_file("/data/inbox/a.txt");
    let (task, completion) = h.task(h.request("/data/inbox"));

    task.run().unwrap();
    task.run().unwrap();

    assert!(h.fs.exists(Path::new("/data/inbox/a.txt")));
    assert!(h.fs.calls().is_empty());
    assert!(h.events().is_empty());
    assert!(completion.try_get().is_none());
}

#[test]
fn directory_purged_once_it_becomes_empty() {
    let mut h = Harness::new();
    h.fs.add_file("/data/inbox/a.txt");
    let (task, _completion) = h.task(h.request("/data/inbox"));

    task.run().unwrap();
    assert!(h.events().is_empty());

    h.fs.delete_file(Path::new("/data/inbox/a.txt")).unwrap();
    h.clock.advance(std::time::Duration::from_secs(300));
    task.run().unwrap();

    assert!(!h.fs.exists(Path::new("/data/inbox")));
    assert!(matches!(h.events().as_slice(), [PurgeEvent::Purged { .. }]));
}

#[test]
fn forced_non_empty_directory_is_purged_immediately() {
    let h = Harness::new();
    h.fs.add_file("/data/inbox/a.txt");
    let (task, _completion) = h.task(h.request("/data/inbox").forced());

    task.run().unwrap();

    assert!(!h.fs.exists(Path::new("/data/inbox")));
}

#[test]
fn expired_non_empty_directory_without_force_fails() {
    let mut h = Harness::new();
    h.fs.add_file("/data/inbox/a.txt");
    let (task, _completion) = h.task(h.request("/data/inbox"));

    h.clock.advance(std::time::Duration::from_secs(2 * 3600));
    let err = task.run().unwrap_err();

    assert!(matches!(err, PurgeError::PurgeFailed { ref reason, .. } if reason == "directory never became empty"));
    assert!(h.fs.exists(Path::new("/data/inbox/a.txt")));
    assert!(matches!(h.events().as_slice(), [PurgeEvent::Failed { .. }]));
}

#[test]
fn expiry_is_strictly_after_deadline() {
    let mut h = Harness::new();
    h.fs.add_file("/data/inbox/a.txt");
    let (task, _completion) = h.task(h.request("/data/inbox"));

    h.clock.advance(std::time::Duration::from_secs(3600));
    task.run().unwrap();

    assert!(h.events().is_empty());
}

#[test]
fn file_path_is_treated_as_not_yet() {
    let mut h = Harness::new();
    h.fs.add_file("/data/inbox");
    let (task, completion) = h.task(h.request("/data/inbox"));

    task.run().unwrap();

    assert!(h.fs.exists(Path::new("/data/inbox")));
    assert!(h.events().is_empty());
    assert!(completion.try_get().is_none());
}

#[test]
fn failed_forced_purge_reports_reason() {
    let h = Harness::new();
    h.fs.add_file("/data/inbox/a.txt");
    h.fs.fail_recursive_delete("/data/inbox");
    let (task, _completion) = h.task(h.request("/data/inbox").forced());

    let err = task.run().unwrap_err();

    assert!(err.to_string().contains("unable to recursively delete /data/inbox"));
}

#[test]
fn finished_task_stays_silent_on_later_ticks() {
    let mut h = Harness::new();
    let (task, _completion) = h.task(h.request("/does/not/exist"));

    assert!(task.run().is_err());
    assert!(task.run().is_ok());

    assert_eq!(h.events().len(), 1);
}
