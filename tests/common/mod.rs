//! Shared fakes for integration tests: an in-memory remote service and a
//! clock that records sleeps instead of waiting.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use father::core::{Clock, Lexicon, PartOfSpeech, RemoteClient};
use father::error::{Error, Result};
use father::types::{AccountId, Cursor, Page, RelationKind, StatusId, TimelineItem};

/// Fixed process start used across tests
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn after_t0(secs: i64) -> DateTime<Utc> {
    t0() + ChronoDuration::seconds(secs)
}

pub fn ids(list: &[&str]) -> Vec<AccountId> {
    list.iter().map(|id| AccountId::from(*id)).collect()
}

/// Lexicon covering the words the tests post
pub fn test_lexicon() -> Lexicon {
    Lexicon::from_entries([
        ("feeling", PartOfSpeech::Adjective),
        ("great", PartOfSpeech::Adjective),
        ("tired", PartOfSpeech::Adjective),
        ("really", PartOfSpeech::Adverb),
    ])
}

/// Canned answer for one home timeline poll. Items at or below the
/// requested resume id are filtered out, as the server would.
pub enum TimelineResponse {
    Items(Vec<TimelineItem>),
    RateLimited,
    Transport,
    Malformed,
}

#[derive(Default)]
struct FakeState {
    following: Vec<AccountId>,
    followers: Vec<AccountId>,
    page_size: usize,
    fail_relation: Option<RelationKind>,
    fail_follow: HashSet<AccountId>,
    rate_limit_replies: bool,
    timeline: VecDeque<TimelineResponse>,
    timeline_requests: Vec<Option<StatusId>>,
    page_requests: usize,
    follows: Vec<AccountId>,
    unfollows: Vec<AccountId>,
    replies: Vec<(StatusId, String)>,
}

/// In-memory remote service
pub struct FakeClient {
    me: AccountId,
    reject_credentials: bool,
    state: Mutex<FakeState>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self {
            me: AccountId::new("me"),
            reject_credentials: false,
            state: Mutex::new(FakeState {
                page_size: 2,
                ..FakeState::default()
            }),
        }
    }

    pub fn rejecting_credentials() -> Self {
        Self {
            reject_credentials: true,
            ..Self::new()
        }
    }

    pub fn with_relations(self, following: &[&str], followers: &[&str]) -> Self {
        self.set_relations(following, followers);
        self
    }

    pub fn set_relations(&self, following: &[&str], followers: &[&str]) {
        let mut state = self.state.lock().unwrap();
        state.following = ids(following);
        state.followers = ids(followers);
    }

    pub fn fail_relation(&self, kind: Option<RelationKind>) {
        self.state.lock().unwrap().fail_relation = kind;
    }

    pub fn fail_follow_of(&self, id: &str) {
        self.state.lock().unwrap().fail_follow.insert(AccountId::from(id));
    }

    pub fn set_replies_rate_limited(&self, limited: bool) {
        self.state.lock().unwrap().rate_limit_replies = limited;
    }

    pub fn push_timeline(&self, response: TimelineResponse) {
        self.state.lock().unwrap().timeline.push_back(response);
    }

    pub fn follows(&self) -> Vec<AccountId> {
        self.state.lock().unwrap().follows.clone()
    }

    pub fn unfollows(&self) -> Vec<AccountId> {
        self.state.lock().unwrap().unfollows.clone()
    }

    pub fn replies(&self) -> Vec<(StatusId, String)> {
        self.state.lock().unwrap().replies.clone()
    }

    /// Resume ids the timeline was polled with, priming poll included
    pub fn timeline_requests(&self) -> Vec<Option<StatusId>> {
        self.state.lock().unwrap().timeline_requests.clone()
    }

    pub fn page_requests(&self) -> usize {
        self.state.lock().unwrap().page_requests
    }
}

#[async_trait]
impl RemoteClient for FakeClient {
    async fn verify_credentials(&self) -> Result<AccountId> {
        if self.reject_credentials {
            return Err(Error::Transport("HTTP 401 Unauthorized".into()));
        }
        Ok(self.me.clone())
    }

    async fn fetch_page(&self, kind: RelationKind, _subject: &AccountId, cursor: Option<&Cursor>) -> Result<Page> {
        let mut state = self.state.lock().unwrap();
        state.page_requests += 1;
        if state.fail_relation == Some(kind) {
            return Err(Error::Transport("connection reset".into()));
        }
        let all = match kind {
            RelationKind::Following => &state.following,
            RelationKind::Followers => &state.followers,
        };
        let start: usize = cursor.map(|c| c.as_str().parse().unwrap()).unwrap_or(0);
        let end = (start + state.page_size).min(all.len());
        let items = all[start..end].to_vec();
        if end < all.len() {
            Ok(Page::with_next(items, Cursor::new(end.to_string())))
        } else {
            Ok(Page::last(items))
        }
    }

    async fn follow(&self, account: &AccountId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_follow.contains(account) {
            return Err(Error::action("follow", account.as_str(), "HTTP 403"));
        }
        state.follows.push(account.clone());
        Ok(())
    }

    async fn unfollow(&self, account: &AccountId) -> Result<()> {
        self.state.lock().unwrap().unfollows.push(account.clone());
        Ok(())
    }

    async fn poll_home_timeline(&self, after: Option<&StatusId>) -> Result<Vec<TimelineItem>> {
        let mut state = self.state.lock().unwrap();
        state.timeline_requests.push(after.cloned());
        match state.timeline.pop_front() {
            None => Ok(Vec::new()),
            Some(TimelineResponse::Items(items)) => Ok(items
                .into_iter()
                .filter(|item| after.map_or(true, |after| item.id > *after))
                .collect()),
            Some(TimelineResponse::RateLimited) => Err(Error::RateLimited { retry_after_secs: None }),
            Some(TimelineResponse::Transport) => Err(Error::Transport("timed out".into())),
            Some(TimelineResponse::Malformed) => Err(Error::Json(serde_json::from_str::<u8>("x").unwrap_err())),
        }
    }

    async fn post_reply(&self, in_reply_to: &StatusId, body: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.rate_limit_replies {
            return Err(Error::RateLimited { retry_after_secs: Some(60) });
        }
        state.replies.push((in_reply_to.clone(), body.to_string()));
        Ok(())
    }
}

/// Clock that never waits: sleeping moves `now` forward and is recorded
pub struct FakeClock {
    now: Mutex<DateTime<Utc>>,
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        let mut now = self.now.lock().unwrap();
        *now = *now + ChronoDuration::from_std(duration).unwrap();
    }
}
