//! Account identifiers, relation sets and pagination pages

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Opaque identifier of a remote account.
///
/// Ordering is plain string ordering; the engine never looks inside.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of accounts. Sorted, so iteration order is deterministic.
pub type RelationSet = BTreeSet<AccountId>;

/// Which side of the relationship a collection describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Accounts the subject follows (outbound, "friends")
    Following,
    /// Accounts following the subject (inbound)
    Followers,
}

impl RelationKind {
    /// Path segment used by the remote API
    pub fn path_segment(&self) -> &'static str {
        match self {
            RelationKind::Following => "following",
            RelationKind::Followers => "followers",
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Opaque continuation token for a paginated fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of a relation collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Accounts on this page
    pub items: Vec<AccountId>,
    /// Where to resume, `None` when the collection is exhausted
    pub next: Option<Cursor>,
}

impl Page {
    /// Final page: no continuation
    pub fn last(items: Vec<AccountId>) -> Self {
        Self { items, next: None }
    }

    /// Page followed by more
    pub fn with_next(items: Vec<AccountId>, next: Cursor) -> Self {
        Self { items, next: Some(next) }
    }

    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}
