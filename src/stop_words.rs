use std::collections::BTreeSet;

use crate::error::{Result, SearchError};
use crate::tokenizer::{contains_restricted_symbols, split_into_words};

/// Words excluded from indexing and querying entirely.
///
/// Immutable after construction. Matching is case-sensitive; a word
/// containing control characters fails construction.
#[derive(Debug, Clone, Default)]
pub struct StopWordSet {
    words: BTreeSet<String>,
}

impl StopWordSet {
    /// Build from a whitespace-separated string of stop words.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_words(split_into_words(text))
    }

    /// Build from any sequence of words, deduplicating and dropping
    /// empty entries.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if contains_restricted_symbols(word) {
                return Err(SearchError::InvalidArgument(format!(
                    "stop word {word:?} contains restricted symbols"
                )));
            }
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
