//! Reply gate: who may be answered, and whether this time we do
//!
//! Eligibility: author is a friend, the post is not a reshare, and the text
//! does not open with an @-mention. Eligible posts then face one Bernoulli
//! draw so the bot answers only a fraction of what it could.

use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;

use crate::core::strip_html;
use crate::types::{RelationSet, ReplyDecision, TimelineItem};
use crate::{MAX_STATUS_CHARS, REPLY_PROBABILITY};

lazy_static! {
    /// Leading @user or @user@host
    static ref RE_LEADING_MENTION: Regex = Regex::new(r"^\s*@[\w.\-]+(@[\w.\-]+)?").unwrap();
}

/// Stateless eligibility predicate plus sampler
#[derive(Debug, Clone)]
pub struct ReplyGate {
    sampling_rate: f64,
    max_chars: usize,
}

impl Default for ReplyGate {
    fn default() -> Self {
        Self::new(REPLY_PROBABILITY, MAX_STATUS_CHARS)
    }
}

impl ReplyGate {
    /// Create gate; the rate is clamped to [0, 1]
    pub fn new(sampling_rate: f64, max_chars: usize) -> Self {
        Self {
            sampling_rate: sampling_rate.clamp(0.0, 1.0),
            max_chars,
        }
    }

    /// Why this item may not be answered, `None` when eligible
    pub fn check(&self, item: &TimelineItem, friends: &RelationSet) -> Option<ReplyDecision> {
        if !friends.contains(&item.author) {
            return Some(ReplyDecision::R201_NOT_A_FRIEND);
        }
        if item.is_reshare {
            return Some(ReplyDecision::R202_RESHARE);
        }
        if starts_with_mention(&item.content) {
            return Some(ReplyDecision::R203_DIRECTED_MENTION);
        }
        None
    }

    /// Is this item a reply candidate at all?
    pub fn is_eligible(&self, item: &TimelineItem, friends: &RelationSet) -> bool {
        self.check(item, friends).is_none()
    }

    /// One Bernoulli trial at the configured rate
    pub fn should_reply<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_bool(self.sampling_rate)
    }

    /// Does the composed body fit the status length ceiling?
    pub fn fits_limit(&self, body: &str) -> bool {
        body.chars().count() <= self.max_chars
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }
}

/// Does the post open with an @-mention (after HTML is stripped)?
fn starts_with_mention(content: &str) -> bool {
    RE_LEADING_MENTION.is_match(&strip_html(content))
}

// =============================================================================
// TESTS
// =============================================================================
