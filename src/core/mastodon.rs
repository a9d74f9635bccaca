//! Mastodon REST client
//!
//! Endpoints used:
//! - GET  /api/v1/accounts/verify_credentials
//! - GET  /api/v1/accounts/{id}/following, /followers  (Link header paging)
//! - POST /api/v1/accounts/{id}/follow, /unfollow
//! - GET  /api/v1/timelines/home  (min_id paging, oldest first)
//! - POST /api/v1/statuses

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::{AUTHORIZATION, LINK, RETRY_AFTER};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::core::RemoteClient;
use crate::error::{Error, Result};
use crate::types::{AccountId, Cursor, Page, RelationKind, StatusId, TimelineItem};

/// Accounts per relation page (Mastodon maximum)
pub const RELATION_PAGE_LIMIT: u32 = 80;

/// Statuses per home timeline request (Mastodon maximum)
pub const TIMELINE_PAGE_LIMIT: u32 = 40;

/// Most home timeline pages fetched by one poll; the rest wait for the next
pub const MAX_TIMELINE_PAGES: usize = 10;

/// Per-request timeout
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

lazy_static! {
    static ref RE_NEXT_LINK: Regex = Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#).unwrap();
    static ref RE_MAX_ID: Regex = Regex::new(r"[?&]max_id=([^&]+)").unwrap();
}

#[derive(Debug, Deserialize)]
struct AccountJson {
    id: String,
    #[serde(default)]
    acct: String,
}

#[derive(Debug, Deserialize)]
struct StatusJson {
    id: String,
    created_at: DateTime<Utc>,
    account: AccountJson,
    #[serde(default)]
    reblog: Option<serde_json::Value>,
    #[serde(default)]
    content: String,
}

impl From<StatusJson> for TimelineItem {
    fn from(status: StatusJson) -> Self {
        TimelineItem {
            id: StatusId::new(status.id),
            author: AccountId::new(status.account.id),
            author_acct: status.account.acct,
            created_at: status.created_at,
            is_reshare: status.reblog.is_some(),
            content: status.content,
        }
    }
}

/// Client for one Mastodon instance and one bot account
#[derive(Debug)]
pub struct MastodonClient {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl MastodonClient {
    /// Create client for `base_url` authenticated with `token`
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("father/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let response = self
            .http
            .get(self.url(path))
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .query(query)
            .send()
            .await?;
        check_status(response).await
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<Response> {
        let response = self
            .http
            .post(self.url(path))
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .json(&body)
            .send()
            .await?;
        check_status(response).await
    }

    /// Run an account action, mapping non-rate-limit failures to `Error::Action`
    async fn account_action(&self, action: &'static str, account: &AccountId, body: serde_json::Value) -> Result<()> {
        let path = format!("/api/v1/accounts/{}/{}", account, action);
        match self.post(&path, body).await {
            Ok(_) => {
                info!(%account, action, "account action done");
                Ok(())
            }
            Err(e) if e.is_rate_limit() => Err(e),
            Err(e) => Err(Error::action(action, account.as_str(), e)),
        }
    }

    /// One home timeline page, newest first
    async fn home_page(&self, min_id: Option<&StatusId>) -> Result<Vec<StatusJson>> {
        let mut query = vec![("limit", TIMELINE_PAGE_LIMIT.to_string())];
        if let Some(min_id) = min_id {
            query.push(("min_id", min_id.as_str().to_string()));
        }
        Ok(self.get("/api/v1/timelines/home", &query).await?.json().await?)
    }
}

#[async_trait]
impl RemoteClient for MastodonClient {
    async fn verify_credentials(&self) -> Result<AccountId> {
        let account: AccountJson = self
            .get("/api/v1/accounts/verify_credentials", &[])
            .await?
            .json()
            .await?;
        info!(id = %account.id, acct = %account.acct, "credentials verified");
        Ok(AccountId::new(account.id))
    }

    async fn fetch_page(&self, kind: RelationKind, subject: &AccountId, cursor: Option<&Cursor>) -> Result<Page> {
        let path = format!("/api/v1/accounts/{}/{}", subject, kind.path_segment());
        let mut query = vec![("limit", RELATION_PAGE_LIMIT.to_string())];
        if let Some(cursor) = cursor {
            query.push(("max_id", cursor.as_str().to_string()));
        }

        let response = self.get(&path, &query).await?;
        let next = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_cursor);
        let accounts: Vec<AccountJson> = response.json().await?;

        debug!(%kind, items = accounts.len(), has_next = next.is_some(), "relation page");
        let items: Vec<AccountId> = accounts.into_iter().map(|a| AccountId::new(a.id)).collect();
        if items.is_empty() {
            return Ok(Page::last(items));
        }
        Ok(Page { items, next })
    }

    async fn follow(&self, account: &AccountId) -> Result<()> {
        // Follow back without pulling their boosts into the home timeline
        self.account_action("follow", account, serde_json::json!({ "reblogs": false }))
            .await
    }

    async fn unfollow(&self, account: &AccountId) -> Result<()> {
        self.account_action("unfollow", account, serde_json::json!({})).await
    }

    async fn poll_home_timeline(&self, after: Option<&StatusId>) -> Result<Vec<TimelineItem>> {
        // No resume point yet: the newest page is all there is to skip
        let Some(after) = after else {
            let statuses = self.home_page(None).await?;
            debug!(count = statuses.len(), "home timeline polled");
            return Ok(statuses.into_iter().map(TimelineItem::from).collect());
        };

        // min_id pages walk forward from the resume point, oldest page first
        let mut min_id = after.clone();
        let mut items = Vec::new();
        for page in 1..=MAX_TIMELINE_PAGES {
            let statuses = self.home_page(Some(&min_id)).await?;
            let full = statuses.len() >= TIMELINE_PAGE_LIMIT as usize;
            let newest = statuses.iter().map(|s| StatusId::new(s.id.as_str())).max();
            items.extend(statuses.into_iter().map(TimelineItem::from));

            match newest {
                Some(newest) if full && newest > min_id => min_id = newest,
                _ => break,
            }
            debug!(page, "home timeline has another page");
        }

        debug!(count = items.len(), after = %after, "home timeline polled");
        Ok(items)
    }

    async fn post_reply(&self, in_reply_to: &StatusId, body: &str) -> Result<()> {
        let payload = serde_json::json!({
            "status": body,
            "in_reply_to_id": in_reply_to.as_str(),
        });
        match self.post("/api/v1/statuses", payload).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_rate_limit() => Err(e),
            Err(e) => Err(Error::action("reply", in_reply_to.as_str(), e)),
        }
    }
}

/// Map HTTP status to the error taxonomy
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        return Err(Error::RateLimited { retry_after_secs });
    }
    let body = response.text().await.unwrap_or_default();
    let detail: String = body.chars().take(200).collect();
    Err(Error::Transport(format!("HTTP {}: {}", status, detail)))
}

/// Pull the `max_id` of the `rel="next"` link out of a Link header
pub fn next_cursor(link_header: &str) -> Option<Cursor> {
    let next_url = RE_NEXT_LINK.captures(link_header)?.get(1)?.as_str();
    let max_id = RE_MAX_ID.captures(next_url)?.get(1)?.as_str();
    Some(Cursor::new(max_id))
}
