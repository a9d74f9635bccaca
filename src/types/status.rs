//! Status snapshot published by the scheduler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ReconcileOutcome, SchedulerState};

/// Read-only view of the scheduler, written after every transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// When this snapshot was taken
    pub timestamp: DateTime<Utc>,
    pub state: SchedulerState,
    /// Iterations started so far
    pub iteration: u64,
    /// Process start; nothing older is ever answered
    pub started_at: DateTime<Utc>,
    pub watermark: DateTime<Utc>,
    /// Accounts we currently follow
    pub friend_count: usize,
    /// Iterations left until the next reconciliation
    pub reconcile_in: u32,
    pub last_reconcile: Option<ReconcileOutcome>,
    pub replies_posted: u64,
}

impl StatusSnapshot {
    /// Snapshot of a scheduler that has not run yet
    pub fn starting(started_at: DateTime<Utc>) -> Self {
        Self {
            timestamp: started_at,
            state: SchedulerState::Idle,
            iteration: 0,
            started_at,
            watermark: started_at,
            friend_count: 0,
            reconcile_in: 0,
            last_reconcile: None,
            replies_posted: 0,
        }
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "state={} | iteration={} | friends={} | reconcile_in={} | replies={} | watermark={}",
            self.state,
            self.iteration,
            self.friend_count,
            self.reconcile_in,
            self.replies_posted,
            self.watermark.to_rfc3339(),
        )
    }
}
