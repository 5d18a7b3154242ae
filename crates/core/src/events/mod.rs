// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event publication for purge outcomes
//!
//! - `EventPublisher` - the fire-and-forget seam the engine publishes through
//! - `EventBus` - routes events to pattern subscriptions
//! - `EventPattern` - pattern matching over event names

mod bus;
mod subscription;

pub use bus::{EventBus, EventPublisher, EventReceiver, EventSender};
pub use subscription::{EventPattern, SubscriberId, Subscription};
