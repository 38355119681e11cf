//! # Action History
//!
//! A bounded rolling log of recent "interesting" actions. The dispatcher
//! writes to it; the inconsistency detector only reads it, through the
//! [`ActionHistory`] trait, so tests can hand the detector any history they
//! like.

use std::collections::{HashSet, VecDeque};

use crate::shared::action::Action;
use crate::shared::config::AppConfig;
use crate::shared::report::ActionSummary;

/// Read access to recent action summaries
pub trait ActionHistory {
    /// Recent interesting actions, oldest first
    fn interesting_action_summaries(&self) -> Vec<ActionSummary>;
}

/// A fixed history, mostly for tests and one-off detection
impl ActionHistory for Vec<ActionSummary> {
    fn interesting_action_summaries(&self) -> Vec<ActionSummary> {
        self.clone()
    }
}

/// Rolling buffer of action summaries
#[derive(Debug, Clone)]
pub struct ActionLogger {
    capacity: usize,
    uninteresting: HashSet<String>,
    summaries: VecDeque<ActionSummary>,
}

impl ActionLogger {
    /// Create a logger keeping at most `capacity` summaries
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            uninteresting: HashSet::new(),
            summaries: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    /// Create a logger from configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.action_log_capacity)
            .with_uninteresting(config.uninteresting_actions.iter().cloned())
    }

    /// Never record actions of these types
    pub fn with_uninteresting<I>(mut self, action_types: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.uninteresting.extend(action_types);
        self
    }

    /// Record an action at the current time; false if it was filtered out
    pub fn record(&mut self, action: &Action) -> bool {
        self.record_at(action, chrono::Utc::now().timestamp_millis())
    }

    /// Record an action at a given time (milliseconds since the epoch)
    pub fn record_at(&mut self, action: &Action, time: i64) -> bool {
        let action_type = action.action_type();
        if self.uninteresting.contains(action_type) {
            return false;
        }
        if self.summaries.len() == self.capacity {
            self.summaries.pop_front();
        }
        self.summaries.push_back(ActionSummary {
            action_type: action_type.to_string(),
            time,
            summary: action.summary(),
        });
        true
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Drop the most recent summary
    ///
    /// Used when a recorded action never took effect. An entry evicted to
    /// make room for it is not brought back.
    pub fn discard_latest(&mut self) -> Option<ActionSummary> {
        self.summaries.pop_back()
    }
}

impl ActionHistory for ActionLogger {
    fn interesting_action_summaries(&self) -> Vec<ActionSummary> {
        self.summaries.iter().cloned().collect()
    }
}
