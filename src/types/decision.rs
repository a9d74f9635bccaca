//! Reason codes for reply decisions
//! Every timeline item ends in exactly one of these

use serde::{Deserialize, Serialize};

/// Verdict for a single timeline item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReplyDecision {
    // =========================================================================
    // R1xx: Cursor
    // =========================================================================
    /// Created at or before the watermark or process start
    R101_ALREADY_SEEN,

    // =========================================================================
    // R2xx: Eligibility
    // =========================================================================
    /// Author is not somebody we follow
    R201_NOT_A_FRIEND,
    /// Boost of another post
    R202_RESHARE,
    /// Text opens with an @-mention
    R203_DIRECTED_MENTION,

    // =========================================================================
    // R3xx: Composition
    // =========================================================================
    /// Compositor found nothing to say
    R301_NO_MATCH,
    /// Composed body exceeds the status length ceiling
    R302_TOO_LONG,

    // =========================================================================
    // R4xx: Sampling
    // =========================================================================
    /// Lost the Bernoulli draw
    R401_NOT_SAMPLED,

    // =========================================================================
    // R5xx: Outcome
    // =========================================================================
    /// Reply posted
    R501_REPLIED,
    /// Reply was rejected by the remote service
    R502_REPLY_FAILED,
}

impl ReplyDecision {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R101_ALREADY_SEEN => "R101_ALREADY_SEEN",
            Self::R201_NOT_A_FRIEND => "R201_NOT_A_FRIEND",
            Self::R202_RESHARE => "R202_RESHARE",
            Self::R203_DIRECTED_MENTION => "R203_DIRECTED_MENTION",
            Self::R301_NO_MATCH => "R301_NO_MATCH",
            Self::R302_TOO_LONG => "R302_TOO_LONG",
            Self::R401_NOT_SAMPLED => "R401_NOT_SAMPLED",
            Self::R501_REPLIED => "R501_REPLIED",
            Self::R502_REPLY_FAILED => "R502_REPLY_FAILED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R101_ALREADY_SEEN => "Already processed",
            Self::R201_NOT_A_FRIEND => "Author not followed",
            Self::R202_RESHARE => "Reshare ignored",
            Self::R203_DIRECTED_MENTION => "Directed at someone",
            Self::R301_NO_MATCH => "Nothing to answer",
            Self::R302_TOO_LONG => "Reply over length ceiling",
            Self::R401_NOT_SAMPLED => "Not sampled",
            Self::R501_REPLIED => "Replied",
            Self::R502_REPLY_FAILED => "Reply rejected",
        }
    }

    /// Did this item pass the eligibility checks?
    pub fn was_eligible(&self) -> bool {
        !matches!(
            self,
            Self::R101_ALREADY_SEEN
                | Self::R201_NOT_A_FRIEND
                | Self::R202_RESHARE
                | Self::R203_DIRECTED_MENTION
        )
    }
}

impl std::fmt::Display for ReplyDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligibility_split() {
        for rejected in [
            ReplyDecision::R101_ALREADY_SEEN,
            ReplyDecision::R201_NOT_A_FRIEND,
            ReplyDecision::R202_RESHARE,
            ReplyDecision::R203_DIRECTED_MENTION,
        ] {
            assert!(!rejected.was_eligible(), "{}", rejected);
        }
        for eligible in [
            ReplyDecision::R301_NO_MATCH,
            ReplyDecision::R401_NOT_SAMPLED,
            ReplyDecision::R501_REPLIED,
            ReplyDecision::R502_REPLY_FAILED,
        ] {
            assert!(eligible.was_eligible(), "{}", eligible);
        }
    }

    #[test]
    fn test_display_carries_code() {
        assert!(ReplyDecision::R202_RESHARE.to_string().starts_with("R202"));
    }
}
