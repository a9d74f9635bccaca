//! Timeline cursor: the high-water mark of processed posts
//!
//! A post is admitted iff it is newer than both the watermark and the moment
//! the process started. The watermark only ever moves forward.
//!
//! The cursor also holds the remote resume point: the id the next home
//! timeline request starts after. It moves only past posts that were
//! evaluated, so a batch cut short is fetched again from where it stopped.

use chrono::{DateTime, Utc};

use crate::types::{StatusId, TimelineItem};

/// Tracks which timeline items have already been evaluated
#[derive(Debug, Clone)]
pub struct TimelineCursor {
    /// Process start; older posts are backlog and never answered
    started_at: DateTime<Utc>,
    /// Newest creation time processed so far
    watermark: DateTime<Utc>,
    /// Next timeline request asks for posts after this id
    resume_after: Option<StatusId>,
}

impl TimelineCursor {
    /// Start a cursor at `now`, with the watermark at the same instant
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            started_at: now,
            watermark: now,
            resume_after: None,
        }
    }

    /// Should this item be processed?
    pub fn admit(&self, item: &TimelineItem) -> bool {
        item.created_at > self.watermark && item.created_at > self.started_at
    }

    /// Move the watermark up to `max_seen`; never moves it down
    pub fn advance(&mut self, max_seen: DateTime<Utc>) {
        if max_seen > self.watermark {
            self.watermark = max_seen;
        }
    }

    /// Filter a batch down to admitted items, oldest first
    pub fn admit_batch(&self, items: Vec<TimelineItem>) -> Vec<TimelineItem> {
        let mut admitted: Vec<TimelineItem> = items.into_iter().filter(|item| self.admit(item)).collect();
        admitted.sort_by_key(|item| item.created_at);
        admitted
    }

    /// Move the resume point up to `id`; never moves it down
    pub fn resume_from(&mut self, id: StatusId) {
        if self.resume_after.as_ref().map_or(true, |current| id > *current) {
            self.resume_after = Some(id);
        }
    }

    pub fn resume_after(&self) -> Option<&StatusId> {
        self.resume_after.as_ref()
    }

    pub fn watermark(&self) -> DateTime<Utc> {
        self.watermark
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

// =============================================================================
// TESTS
// =============================================================================
