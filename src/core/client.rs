//! Remote service boundary
//!
//! Everything the engine needs from the social network, as one trait.
//! `MastodonClient` is the real implementation; tests plug in fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AccountId, Cursor, Page, RelationKind, StatusId, TimelineItem};

/// Calls the engine makes against the remote service
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Check the token and return the bot's own account id
    async fn verify_credentials(&self) -> Result<AccountId>;

    /// One page of `subject`'s followers or following, resuming at `cursor`
    async fn fetch_page(
        &self,
        kind: RelationKind,
        subject: &AccountId,
        cursor: Option<&Cursor>,
    ) -> Result<Page>;

    async fn follow(&self, account: &AccountId) -> Result<()>;

    async fn unfollow(&self, account: &AccountId) -> Result<()>;

    /// Every post newer than `after`. With no `after`, only the newest page.
    async fn poll_home_timeline(&self, after: Option<&StatusId>) -> Result<Vec<TimelineItem>>;

    async fn post_reply(&self, in_reply_to: &StatusId, body: &str) -> Result<()>;
}
