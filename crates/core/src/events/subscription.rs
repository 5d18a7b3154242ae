// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event name patterns and subscriptions

/// Pattern over colon-separated event names
///
/// - `purge:failed` matches only that event
/// - `purge:*` matches exactly one segment after `purge:`
/// - `purge:**` (or `**`, `*` alone) matches everything from that point on
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventPattern(String);

impl EventPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// Pattern matching every event
    pub fn any() -> Self {
        Self::new("**")
    }

    pub fn matches(&self, event_name: &str) -> bool {
        match self.0.as_str() {
            "" => false,
            "*" | "**" => true,
            pattern => {
                let mut expected = pattern.split(':');
                let mut actual = event_name.split(':');
                loop {
                    match (expected.next(), actual.next()) {
                        (None, None) | (Some("**"), _) => return true,
                        (Some("*"), Some(_)) => {}
                        (Some(p), Some(e)) if p == e => {}
                        _ => return false,
                    }
                }
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Subscriber handle for unsubscribing
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub String);

/// A named interest in events matching any of a set of patterns
#[derive(Clone, Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub patterns: Vec<EventPattern>,
}

impl Subscription {
    pub fn new(id: impl Into<String>, patterns: Vec<EventPattern>) -> Self {
        Self {
            id: SubscriberId(id.into()),
            patterns,
        }
    }

    pub fn matches(&self, event_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(event_name))
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
