//! Poll scheduler: the agent's control loop
//!
//! State transitions, once per iteration:
//! - IDLE → RECONCILING_FRIENDS: countdown reached zero
//! - IDLE / RECONCILING_FRIENDS → POLLING_TIMELINE: always
//! - POLLING_TIMELINE → SLEEPING: always; backoff added after rate limiting
//! - SLEEPING → IDLE: sleep finished
//!
//! `step` covers everything up to SLEEPING; `run_iteration` adds the sleep.
//! Nothing inside an iteration can end the loop. Only `start` can fail, and
//! that failure is fatal.

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::core::{Clock, Compositor, PaginatedCollector, RemoteClient, ReplyGate, SetReconciler, TimelineCursor};
use crate::error::{Error, Result};
use crate::types::{
    AccountId, IterationReport, PolicyConfig, ReconcileOutcome, RelationKind, RelationSet, ReplyDecision,
    SchedulerState, StatusSnapshot, TimelineItem,
};

/// Shared, read-only view of the scheduler for the status endpoint
pub type StatusHandle = Arc<RwLock<StatusSnapshot>>;

/// Owns all agent state and drives the loop
pub struct PollScheduler<C, P, K, R>
where
    C: RemoteClient + ?Sized,
    P: Compositor,
    K: Clock + ?Sized,
    R: Rng,
{
    client: Arc<C>,
    compositor: P,
    clock: Arc<K>,
    rng: R,
    policy: PolicyConfig,
    /// The bot's own account
    me: AccountId,
    state: SchedulerState,
    collector: PaginatedCollector,
    reconciler: SetReconciler,
    cursor: TimelineCursor,
    gate: ReplyGate,
    /// Accounts we follow, replaced wholesale by each reconciliation pass
    friends: RelationSet,
    /// Iterations left until the next reconciliation
    countdown: u32,
    iteration: u64,
    replies_posted: u64,
    last_reconcile: Option<ReconcileOutcome>,
    status: StatusHandle,
}

impl<C, P, K, R> PollScheduler<C, P, K, R>
where
    C: RemoteClient + ?Sized,
    P: Compositor,
    K: Clock + ?Sized,
    R: Rng,
{
    /// Verify credentials, prime the timeline and set the watermark to now.
    ///
    /// Any error here is a startup error and the caller should exit.
    pub async fn start(client: Arc<C>, compositor: P, clock: Arc<K>, rng: R, policy: PolicyConfig) -> Result<Self> {
        policy.validate()?;

        let me = client
            .verify_credentials()
            .await
            .map_err(|e| Error::Startup(format!("cannot verify credentials: {}", e)))?;

        // Posts from before startup are backlog; resume after the newest one
        let now = clock.now();
        let mut cursor = TimelineCursor::new(now);
        match client.poll_home_timeline(None).await {
            Ok(backlog) => {
                debug!(skipped = backlog.len(), "home timeline primed");
                if let Some(newest) = backlog.into_iter().map(|item| item.id).max() {
                    cursor.resume_from(newest);
                }
            }
            Err(e) => warn!(error = %e, "could not prime home timeline"),
        }

        info!(account = %me, started_at = %now.to_rfc3339(), dry_run = policy.dry_run, "scheduler started");

        Ok(Self {
            gate: ReplyGate::new(policy.reply_probability, policy.max_status_chars),
            client,
            compositor,
            clock,
            rng,
            policy,
            me,
            state: SchedulerState::Idle,
            collector: PaginatedCollector::new(),
            reconciler: SetReconciler::new(),
            cursor,
            friends: RelationSet::new(),
            countdown: 0,
            iteration: 0,
            replies_posted: 0,
            last_reconcile: None,
            status: Arc::new(RwLock::new(StatusSnapshot::starting(now))),
        })
    }

    /// Run forever
    pub async fn run(&mut self) {
        loop {
            let report = self.run_iteration().await;
            debug!(
                iteration = report.iteration,
                admitted = report.items_admitted,
                replies = report.replies_posted,
                sleep_secs = report.sleep_secs,
                "iteration finished"
            );
        }
    }

    /// One full IDLE → ... → SLEEPING cycle, including the sleep
    pub async fn run_iteration(&mut self) -> IterationReport {
        let report = self.step().await;

        self.transition(SchedulerState::Sleeping).await;
        if report.backoff_applied {
            warn!(backoff_secs = self.policy.rate_limit_backoff_secs, "backing off after remote error");
        }
        self.clock.sleep(Duration::from_secs(report.sleep_secs)).await;

        report
    }

    /// Reconcile if due and poll once, without sleeping afterwards.
    /// The report carries the sleep the loop would take next.
    pub async fn step(&mut self) -> IterationReport {
        self.iteration += 1;
        let mut report = IterationReport::new(self.iteration);
        self.transition(SchedulerState::Idle).await;

        if self.countdown == 0 {
            self.transition(SchedulerState::ReconcilingFriends).await;
            let outcome = self.reconcile_pass().await;
            self.last_reconcile = Some(outcome.clone());
            report.reconcile = outcome;
            // Reset even on failure, so a broken fetch is not retried every iteration
            self.countdown = self.policy.reconcile_every;
        }
        self.countdown = self.countdown.saturating_sub(1);

        self.transition(SchedulerState::PollingTimeline).await;
        let backoff = self.poll_pass(&mut report).await;

        let mut sleep = self.policy.poll_interval();
        if backoff {
            sleep += self.policy.rate_limit_backoff();
            report.backoff_applied = true;
        }
        report.sleep_secs = sleep.as_secs();

        report
    }

    /// Fetch both relations and apply the delta
    async fn reconcile_pass(&mut self) -> ReconcileOutcome {
        let client = &*self.client;

        let following = match self.collector.fetch_all(client, RelationKind::Following, &self.me).await {
            Ok(set) => set,
            Err(e) => {
                warn!(error = %e, "reconciliation skipped, keeping previous friend set");
                return ReconcileOutcome::Failed { error: e.to_string() };
            }
        };
        let followers = match self.collector.fetch_all(client, RelationKind::Followers, &self.me).await {
            Ok(set) => set,
            Err(e) => {
                warn!(error = %e, "reconciliation skipped, keeping previous friend set");
                return ReconcileOutcome::Failed { error: e.to_string() };
            }
        };

        if followers.is_empty()
            && self.policy.guard_empty_followers
            && (!following.is_empty() || !self.friends.is_empty())
        {
            warn!(
                following = following.len(),
                "followers came back empty, not unfollowing everyone"
            );
            self.friends = following;
            return ReconcileOutcome::SkippedEmptyFollowers;
        }

        let dry_run = self.policy.dry_run;
        let report = self
            .reconciler
            .reconcile(
                &following,
                &followers,
                move |account| async move {
                    if dry_run {
                        info!(%account, "dry run: would unfollow");
                        return Ok(());
                    }
                    client.unfollow(&account).await
                },
                move |account| async move {
                    if dry_run {
                        info!(%account, "dry run: would follow");
                        return Ok(());
                    }
                    client.follow(&account).await
                },
            )
            .await;

        self.friends = report.apply_to(&following);
        ReconcileOutcome::Completed(report)
    }

    /// Poll the timeline and answer what qualifies. Returns whether to back off.
    async fn poll_pass(&mut self, report: &mut IterationReport) -> bool {
        let items = match self.client.poll_home_timeline(self.cursor.resume_after()).await {
            Ok(items) => items,
            Err(e) => {
                report.poll_error = Some(e.to_string());
                if e.is_transient() {
                    warn!(error = %e, "timeline poll failed");
                    return true;
                }
                error!(error = %e, "timeline poll failed");
                return false;
            }
        };

        report.items_seen = items.len();
        let newest_seen = items.iter().map(|item| item.id.clone()).max();
        let admitted = self.cursor.admit_batch(items);
        report.items_admitted = admitted.len();
        if report.items_seen > report.items_admitted {
            debug!(
                skipped = report.items_seen - report.items_admitted,
                decision = ReplyDecision::R101_ALREADY_SEEN.code(),
                "timeline items behind the watermark"
            );
        }

        let mut backoff = false;
        let mut last_evaluated: Option<&TimelineItem> = None;
        for item in &admitted {
            last_evaluated = Some(item);

            let decision = match self.handle_item(item).await {
                Ok(decision) => decision,
                Err(e) => {
                    report.reply_failures += 1;
                    warn!(status = %item.id, error = %e, "reply failed");
                    if e.is_rate_limit() {
                        report.poll_error = Some(e.to_string());
                        backoff = true;
                    }
                    ReplyDecision::R502_REPLY_FAILED
                }
            };

            if decision.was_eligible() {
                report.items_eligible += 1;
            }
            if decision == ReplyDecision::R501_REPLIED {
                report.replies_posted += 1;
                self.replies_posted += 1;
            }
            debug!(status = %item.id, author = %item.author, decision = decision.code(), "timeline item");

            if backoff {
                break;
            }
        }

        if let Some(last) = last_evaluated {
            self.cursor.advance(last.created_at);
        }
        // Cut short: resume right after the last evaluated post so the rest
        // comes back on the next poll
        let resume = if backoff {
            last_evaluated.map(|item| item.id.clone())
        } else {
            newest_seen
        };
        if let Some(id) = resume {
            self.cursor.resume_from(id);
        }
        backoff
    }

    /// Gate, sample, compose, check length, post
    async fn handle_item(&mut self, item: &TimelineItem) -> Result<ReplyDecision> {
        if let Some(rejected) = self.gate.check(item, &self.friends) {
            return Ok(rejected);
        }
        if !self.gate.should_reply(&mut self.rng) {
            return Ok(ReplyDecision::R401_NOT_SAMPLED);
        }
        let body = match self.compositor.compose(item) {
            Some(body) => body,
            None => return Ok(ReplyDecision::R301_NO_MATCH),
        };
        if !self.gate.fits_limit(&body) {
            debug!(status = %item.id, chars = body.chars().count(), "reply over length ceiling, skipped");
            return Ok(ReplyDecision::R302_TOO_LONG);
        }

        if self.policy.dry_run {
            info!(status = %item.id, %body, "dry run: would reply");
            return Ok(ReplyDecision::R501_REPLIED);
        }
        self.client.post_reply(&item.id, &body).await?;
        info!(status = %item.id, author = %item.author_acct, %body, "replied");
        Ok(ReplyDecision::R501_REPLIED)
    }

    async fn transition(&mut self, state: SchedulerState) {
        if state != self.state {
            debug!(from = %self.state, to = %state, "state transition");
        }
        self.state = state;
        let snapshot = self.snapshot();
        *self.status.write().await = snapshot;
    }

    fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            timestamp: self.clock.now(),
            state: self.state,
            iteration: self.iteration,
            started_at: self.cursor.started_at(),
            watermark: self.cursor.watermark(),
            friend_count: self.friends.len(),
            reconcile_in: self.countdown,
            last_reconcile: self.last_reconcile.clone(),
            replies_posted: self.replies_posted,
        }
    }

    /// Handle for readers of the status snapshot
    pub fn status_handle(&self) -> StatusHandle {
        Arc::clone(&self.status)
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn friends(&self) -> &RelationSet {
        &self.friends
    }

    pub fn account(&self) -> &AccountId {
        &self.me
    }

    pub fn cursor(&self) -> &TimelineCursor {
        &self.cursor
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }
}
