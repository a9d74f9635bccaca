//! Reply compositor: turns "I'm tired" into "Hi Tired, I'm Dad."
//!
//! Matching rules:
//! - find the first token that canonicalises to `im`
//! - next token adverb + the one after adjective → name is both
//! - otherwise next token adjective → name is that word
//! - no name → no reply

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::lexicon::{Lexicon, PartOfSpeech};
use crate::types::TimelineItem;

lazy_static! {
    static ref RE_BREAK_TAG: Regex = Regex::new(r"(?i)<br\s*/?>|</p>").unwrap();
    static ref RE_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Produces a reply body for a post, or nothing
pub trait Compositor: Send + Sync {
    fn compose(&self, item: &TimelineItem) -> Option<String>;
}

/// The "Hi X, I'm Dad." compositor
#[derive(Debug, Clone)]
pub struct DadCompositor {
    lexicon: Lexicon,
}

impl DadCompositor {
    /// Create compositor over a lexicon
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Find the "name" a post gives itself, title-cased
    pub fn find_name(&self, text: &str) -> Option<String> {
        let tokens: Vec<String> = strip_html(text).split_whitespace().map(canonicalize).collect();

        let im = tokens.iter().position(|t| t == "im")?;
        let first = tokens.get(im + 1)?;

        if self.lexicon.is(first, PartOfSpeech::Adverb) {
            if let Some(second) = tokens.get(im + 2) {
                if self.lexicon.is(second, PartOfSpeech::Adjective) {
                    return Some(format!("{} {}", title_case(first), title_case(second)));
                }
            }
        }

        if self.lexicon.is(first, PartOfSpeech::Adjective) {
            return Some(title_case(first));
        }

        None
    }
}

impl Compositor for DadCompositor {
    fn compose(&self, item: &TimelineItem) -> Option<String> {
        let name = self.find_name(&item.content)?;
        Some(format!("@{} Hi {}, I'm Dad.", item.author_acct, name))
    }
}

/// Remove HTML tags and decode the handful of entities Mastodon emits
pub fn strip_html(html: &str) -> String {
    let spaced = RE_BREAK_TAG.replace_all(html, " ");
    let text = RE_TAG.replace_all(&spaced, "");
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Lowercase ASCII letters only: "I'm" → "im", "TIRED!!" → "tired"
fn canonicalize(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn compositor() -> DadCompositor {
        DadCompositor::new(Lexicon::from_entries([
            ("tired", PartOfSpeech::Adjective),
            ("great", PartOfSpeech::Adjective),
            ("really", PartOfSpeech::Adverb),
            ("so", PartOfSpeech::Adverb),
        ]))
    }

    #[test]
    fn test_single_adjective() {
        assert_eq!(compositor().find_name("honestly I'm tired today"), Some("Tired".to_string()));
    }

    #[test]
    fn test_adverb_adjective_pair() {
        assert_eq!(compositor().find_name("im REALLY great"), Some("Really Great".to_string()));
    }

    #[test]
    fn test_adverb_without_adjective_is_no_match() {
        assert_eq!(compositor().find_name("im so done"), None);
        assert_eq!(compositor().find_name("im really"), None);
    }

    #[test]
    fn test_no_im_no_name() {
        assert_eq!(compositor().find_name("you are tired"), None);
        assert_eq!(compositor().find_name("im"), None);
    }

    #[test]
    fn test_only_first_im_counts() {
        assert_eq!(compositor().find_name("im here and im tired"), None);
    }

    #[test]
    fn test_html_is_stripped() {
        let html = "<p>ugh, I&#39;m <strong>tired</strong></p>";
        assert_eq!(compositor().find_name(html), Some("Tired".to_string()));
    }

    #[test]
    fn test_strip_html_keeps_paragraph_breaks() {
        assert_eq!(strip_html("<p>one</p><p>two<br/>three</p>").split_whitespace().count(), 3);
    }

    #[test]
    fn test_compose_addresses_author() {
        let item = TimelineItem::new("9", "42", Utc::now(), "I'm tired").with_acct("bob@example.social");
        assert_eq!(
            compositor().compose(&item),
            Some("@bob@example.social Hi Tired, I'm Dad.".to_string())
        );
    }
}
