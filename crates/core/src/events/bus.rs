// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fire-and-forget event bus for purge outcomes

use super::subscription::{SubscriberId, Subscription};
use crate::event::PurgeEvent;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// Sender for event delivery
pub type EventSender = mpsc::UnboundedSender<PurgeEvent>;
/// Receiver for event delivery
pub type EventReceiver = mpsc::UnboundedReceiver<PurgeEvent>;

/// Destination for purge events
///
/// Publishing never blocks and never reports delivery; a publisher with no
/// listeners simply drops the event.
pub trait EventPublisher: Clone + Send + Sync + 'static {
    fn publish(&self, event: PurgeEvent);
}

/// Routes events to every subscriber whose patterns match the event name
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<HashMap<SubscriberId, (Subscription, EventSender)>>>,
    /// Optional receiver of every event (for logging and CLI output)
    global_handler: Arc<RwLock<Option<EventSender>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events matching the subscription's patterns
    pub fn subscribe(&self, subscription: Subscription) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = subscription.id.clone();

        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.insert(id, (subscription, tx));

        rx
    }

    pub fn unsubscribe(&self, id: &SubscriberId) {
        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.remove(id);
    }

    /// Set a global handler that receives all events, replacing any previous one
    pub fn set_global_handler(&self) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut handler = self
            .global_handler
            .write()
            .unwrap_or_else(|e| e.into_inner());
        *handler = Some(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl EventPublisher for EventBus {
    fn publish(&self, event: PurgeEvent) {
        let event_name = event.name();
        tracing::trace!(event = event_name, path = %event.request().path().display(), "publish");

        if let Some(tx) = self
            .global_handler
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            let _ = tx.send(event.clone());
        }

        let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        for (subscription, tx) in subs.values() {
            if subscription.matches(event_name) {
                let _ = tx.send(event.clone());
            }
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
