//! Lexicon: which words can act as which part of speech
//!
//! File format, one word per line:
//!
//! ```text
//! # word<TAB>pos[,pos]
//! great	adjective
//! really	adverb
//! fine	adjective,adverb
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

use crate::error::{Error, Result};

/// Parts of speech the compositor cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Adjective,
    Adverb,
}

impl PartOfSpeech {
    fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "adjective" | "adj" | "a" => Some(Self::Adjective),
            "adverb" | "adv" | "r" => Some(Self::Adverb),
            _ => None,
        }
    }
}

/// Word → parts of speech lookup
#[derive(Debug, Default, Clone)]
pub struct Lexicon {
    words: HashMap<String, HashSet<PartOfSpeech>>,
}

impl Lexicon {
    /// Create empty lexicon
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(word, part of speech)` pairs
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, PartOfSpeech)>) -> Self {
        let mut lexicon = Self::new();
        for (word, pos) in entries {
            lexicon.insert(word, pos);
        }
        lexicon
    }

    /// Parse the tab-separated format. Unknown tags are skipped, lines
    /// without a tab are an error.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lexicon = Self::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (word, tags) = line.split_once('\t').ok_or_else(|| {
                Error::Config(format!("lexicon line {}: expected word<TAB>pos, got {:?}", line_no + 1, line))
            })?;
            for pos in tags.split(',').filter_map(PartOfSpeech::parse) {
                lexicon.insert(word, pos);
            }
        }
        Ok(lexicon)
    }

    /// Load from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let lexicon = Self::parse(&std::fs::read_to_string(path)?)?;
        info!(path = %path.display(), words = lexicon.len(), "lexicon loaded");
        Ok(lexicon)
    }

    pub fn insert(&mut self, word: &str, pos: PartOfSpeech) {
        self.words.entry(word.trim().to_lowercase()).or_default().insert(pos);
    }

    /// Can `word` be used as `pos`?
    pub fn is(&self, word: &str, pos: PartOfSpeech) -> bool {
        self.words.get(word).map(|set| set.contains(&pos)).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_format() {
        let lexicon = Lexicon::parse("# comment\ngreat\tadjective\nreally\tadverb\n\nfine\tadj,adv\nodd\tnoun\n").unwrap();
        assert!(lexicon.is("great", PartOfSpeech::Adjective));
        assert!(!lexicon.is("great", PartOfSpeech::Adverb));
        assert!(lexicon.is("fine", PartOfSpeech::Adverb));
        assert!(lexicon.is("fine", PartOfSpeech::Adjective));
        assert!(!lexicon.is("odd", PartOfSpeech::Adjective));
        assert_eq!(lexicon.len(), 3);
    }

    #[test]
    fn test_words_are_lowercased() {
        let lexicon = Lexicon::parse("Great\tadjective\n").unwrap();
        assert!(lexicon.is("great", PartOfSpeech::Adjective));
    }

    #[test]
    fn test_line_without_tab_is_error() {
        assert!(Lexicon::parse("great adjective\n").is_err());
    }
}
