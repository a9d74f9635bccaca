//! Timeline items as seen by the engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::AccountId;

/// Opaque identifier of a remote post
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusId(String);

impl StatusId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Snowflake order: a longer id is newer, equal lengths compare digit by digit
impl Ord for StatusId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.len().cmp(&other.0.len()).then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for StatusId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for StatusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One post from the home timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    /// Post id, used as `in_reply_to` when answering
    pub id: StatusId,
    /// Author account
    pub author: AccountId,
    /// Author handle, used to address the reply (`user` or `user@host`)
    pub author_acct: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Boost of somebody else's post
    pub is_reshare: bool,
    /// Raw content (HTML on Mastodon)
    pub content: String,
}

impl TimelineItem {
    /// Build a plain, non-reshare item
    pub fn new(
        id: impl Into<String>,
        author: impl Into<String>,
        created_at: DateTime<Utc>,
        content: impl Into<String>,
    ) -> Self {
        let author = author.into();
        Self {
            id: StatusId::new(id),
            author_acct: author.clone(),
            author: AccountId::new(author),
            created_at,
            is_reshare: false,
            content: content.into(),
        }
    }

    /// Mark as a reshare
    pub fn reshared(mut self) -> Self {
        self.is_reshare = true;
        self
    }

    /// Set the author's handle
    pub fn with_acct(mut self, acct: impl Into<String>) -> Self {
        self.author_acct = acct.into();
        self
    }
}
