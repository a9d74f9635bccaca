//! Paginated collector: pulls a whole relation collection, page by page
//!
//! The only stop condition is a page without a continuation cursor. Any
//! failing page aborts the fetch; a partial set is never returned because
//! reconciling against it would unfollow everybody on the missing pages.

use tracing::{debug, warn};

use crate::core::RemoteClient;
use crate::error::{Error, Result};
use crate::types::{AccountId, Cursor, RelationKind, RelationSet};

/// Collects every account of a relation
#[derive(Debug, Default)]
pub struct PaginatedCollector;

impl PaginatedCollector {
    /// Create new collector
    pub fn new() -> Self {
        Self
    }

    /// Fetch all of `subject`'s `kind` relation
    pub async fn fetch_all<C>(&self, client: &C, kind: RelationKind, subject: &AccountId) -> Result<RelationSet>
    where
        C: RemoteClient + ?Sized,
    {
        let mut result = RelationSet::new();
        let mut cursor: Option<Cursor> = None;
        let mut pages_fetched = 0usize;

        loop {
            let page = match client.fetch_page(kind, subject, cursor.as_ref()).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(%kind, pages_fetched, error = %e, "paginated fetch aborted");
                    return Err(Error::CollectionFetch {
                        kind,
                        pages_fetched,
                        source: Box::new(e),
                    });
                }
            };
            pages_fetched += 1;

            debug!(%kind, page = pages_fetched, items = page.items.len(), "fetched page");
            result.extend(page.items);

            match page.next {
                Some(next) if cursor.as_ref() == Some(&next) => {
                    // Same cursor twice would loop forever
                    return Err(Error::CollectionFetch {
                        kind,
                        pages_fetched,
                        source: Box::new(Error::Transport(format!(
                            "remote service repeated cursor {}",
                            next.as_str()
                        ))),
                    });
                }
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!(%kind, pages_fetched, total = result.len(), "collection complete");
        Ok(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================
