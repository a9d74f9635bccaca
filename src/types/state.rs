//! Scheduler state definitions

use serde::{Deserialize, Serialize};

/// The four states of the polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchedulerState {
    /// Between iterations, deciding what comes next
    Idle,
    /// Fetching both relations and applying the deltas
    ReconcilingFriends,
    /// Fetching the home timeline and answering posts
    PollingTimeline,
    /// Timed suspension before the next iteration
    Sleeping,
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SchedulerState::Idle => "IDLE",
            SchedulerState::ReconcilingFriends => "RECONCILING_FRIENDS",
            SchedulerState::PollingTimeline => "POLLING_TIMELINE",
            SchedulerState::Sleeping => "SLEEPING",
        };
        write!(f, "{}", name)
    }
}
