//! Reconciliation deltas and per-iteration reports

use serde::{Deserialize, Serialize};

use crate::types::{AccountId, RelationSet};

/// The two disjoint action lists of a reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationDelta {
    /// following − followers: we follow them, they stopped following us
    pub to_unfollow: RelationSet,
    /// followers − following: they follow us, we have not followed back
    pub to_follow: RelationSet,
}

impl ReconciliationDelta {
    pub fn is_empty(&self) -> bool {
        self.to_unfollow.is_empty() && self.to_follow.is_empty()
    }
}

/// A single follow/unfollow that the remote service rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFailure {
    pub account: AccountId,
    pub error: String,
}

/// What a reconciliation pass did, per action kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub unfollowed: Vec<AccountId>,
    pub unfollow_failed: Vec<ActionFailure>,
    pub followed: Vec<AccountId>,
    pub follow_failed: Vec<ActionFailure>,
}

impl ReconciliationReport {
    /// Number of rejected actions, both kinds
    pub fn failure_count(&self) -> usize {
        self.unfollow_failed.len() + self.follow_failed.len()
    }

    /// Number of actions attempted, both kinds
    pub fn attempted(&self) -> usize {
        self.unfollowed.len() + self.followed.len() + self.failure_count()
    }

    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }

    /// Friend set after this pass: `following` minus confirmed unfollows,
    /// plus confirmed follows. Failed actions leave the account where it was.
    pub fn apply_to(&self, following: &RelationSet) -> RelationSet {
        let mut friends = following.clone();
        for account in &self.unfollowed {
            friends.remove(account);
        }
        friends.extend(self.followed.iter().cloned());
        friends
    }
}

/// How the reconciliation step of one iteration ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// Countdown has not reached zero
    NotDue,
    /// Deltas were applied
    Completed(ReconciliationReport),
    /// Followers came back empty while we still follow people; not trusted
    SkippedEmptyFollowers,
    /// A collection fetch failed; prior friend set kept
    Failed { error: String },
}

/// Summary of one scheduler iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationReport {
    /// 1-based iteration number
    pub iteration: u64,
    pub reconcile: ReconcileOutcome,
    /// Items returned by the timeline
    pub items_seen: usize,
    /// Items newer than the watermark
    pub items_admitted: usize,
    /// Admitted items that passed the eligibility checks
    pub items_eligible: usize,
    pub replies_posted: usize,
    pub reply_failures: usize,
    /// Timeline or reply error, if one was hit
    pub poll_error: Option<String>,
    /// Rate-limit backoff was added to the sleep
    pub backoff_applied: bool,
    /// Suspension at the end of the iteration, backoff included
    pub sleep_secs: u64,
}

impl IterationReport {
    pub fn new(iteration: u64) -> Self {
        Self {
            iteration,
            reconcile: ReconcileOutcome::NotDue,
            items_seen: 0,
            items_admitted: 0,
            items_eligible: 0,
            replies_posted: 0,
            reply_failures: 0,
            poll_error: None,
            backoff_applied: false,
            sleep_secs: 0,
        }
    }
}
