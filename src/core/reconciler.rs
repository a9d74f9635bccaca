//! Set reconciler: mirror followers onto following
//!
//! to_unfollow = following − followers
//! to_follow   = followers − following
//!
//! Both come from the same two sets, so they never overlap. Every action is
//! attempted once; a rejected action is recorded and the loop moves on. Nothing
//! is retried here: the next pass rebuilds both sets and tries again.

use std::future::Future;
use tracing::{info, warn};

use crate::error::Result;
use crate::types::{AccountId, ActionFailure, ReconciliationDelta, ReconciliationReport, RelationSet};

/// Computes and applies follow/unfollow deltas
#[derive(Debug, Default)]
pub struct SetReconciler;

impl SetReconciler {
    /// Create new reconciler
    pub fn new() -> Self {
        Self
    }

    /// Compute both deltas without acting on them
    pub fn delta(&self, following: &RelationSet, followers: &RelationSet) -> ReconciliationDelta {
        ReconciliationDelta {
            to_unfollow: following.difference(followers).cloned().collect(),
            to_follow: followers.difference(following).cloned().collect(),
        }
    }

    /// Compute the deltas and run `unfollow` / `follow` on each account
    pub async fn reconcile<U, UFut, F, FFut>(
        &self,
        following: &RelationSet,
        followers: &RelationSet,
        mut unfollow: U,
        mut follow: F,
    ) -> ReconciliationReport
    where
        U: FnMut(AccountId) -> UFut,
        UFut: Future<Output = Result<()>>,
        F: FnMut(AccountId) -> FFut,
        FFut: Future<Output = Result<()>>,
    {
        let delta = self.delta(following, followers);
        let mut report = ReconciliationReport::default();

        if delta.is_empty() {
            info!(friends = following.len(), "relations already in sync");
            return report;
        }

        info!(
            to_unfollow = delta.to_unfollow.len(),
            to_follow = delta.to_follow.len(),
            "applying reconciliation delta"
        );

        for account in delta.to_unfollow {
            match unfollow(account.clone()).await {
                Ok(()) => report.unfollowed.push(account),
                Err(e) => {
                    warn!(%account, error = %e, "unfollow failed");
                    report.unfollow_failed.push(ActionFailure {
                        account,
                        error: e.to_string(),
                    });
                }
            }
        }

        for account in delta.to_follow {
            match follow(account.clone()).await {
                Ok(()) => report.followed.push(account),
                Err(e) => {
                    warn!(%account, error = %e, "follow failed");
                    report.follow_failed.push(ActionFailure {
                        account,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            unfollowed = report.unfollowed.len(),
            followed = report.followed.len(),
            failed = report.failure_count(),
            "reconciliation pass finished"
        );
        report
    }
}

// =============================================================================
// TESTS
// =============================================================================
