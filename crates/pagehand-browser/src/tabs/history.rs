//! Bounded navigation log.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub tab_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

/// Append-only log that forgets its oldest entries past `limit`.
#[derive(Debug)]
pub struct NavigationHistory {
    events: VecDeque<NavigationEvent>,
    limit: usize,
}

impl NavigationHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            events: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn push(&mut self, event: NavigationEvent) {
        if self.events.len() == self.limit {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The newest `n` events, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &NavigationEvent> {
        self.events.iter().skip(self.events.len().saturating_sub(n))
    }
}
