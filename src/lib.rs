//! Father: a Mastodon agent that mirrors its followers and answers "I'm ..." posts
//!
//! The engine keeps the accounts it follows in step with the accounts that
//! follow it, and polls the home timeline every few minutes looking for posts
//! worth a reply. Core flow:
//! scheduler → collector → reconciler, scheduler → timeline → cursor → gate → compositor

pub mod core;
pub mod error;
pub mod types;

pub use error::{Error, Result};

// =============================================================================
// SCHEDULING POLICY
// =============================================================================

/// Seconds between the start of two timeline polls.
/// The remote service allows one home timeline poll every five minutes.
pub const POLL_INTERVAL_SECS: u64 = 5 * 60;

/// Extra seconds to wait after a rate-limit or transport error (10 + 5 = 15 minutes)
pub const RATE_LIMIT_BACKOFF_SECS: u64 = 10 * 60;

/// Reconcile friends with followers every N loop iterations (4 hours)
pub const RECONCILE_EVERY: u32 = (4 * 60 * 60 / POLL_INTERVAL_SECS) as u32;

// =============================================================================
// REPLY POLICY
// =============================================================================

/// Probability that an eligible, matched post actually gets a reply
pub const REPLY_PROBABILITY: f64 = 1.0 / 10.0;

/// Status length ceiling of the remote service, in characters
pub const MAX_STATUS_CHARS: usize = 500;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
