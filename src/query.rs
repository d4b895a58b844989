use std::collections::BTreeSet;

use crate::error::{Result, SearchError};
use crate::stop_words::StopWordSet;
use crate::tokenizer::{contains_restricted_symbols, split_into_words};

/// A parsed query: terms a document must contain and terms that exclude
/// it. Ordered sets keep iteration deterministic.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Query {
    pub plus_words: BTreeSet<String>,
    pub minus_words: BTreeSet<String>,
}

struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
    is_stop: bool,
}

fn parse_query_word<'a>(text: &'a str, stop_words: &StopWordSet) -> Result<QueryWord<'a>> {
    if text.is_empty() {
        return Err(SearchError::InvalidArgument("empty search word".into()));
    }
    if text == "-" {
        return Err(SearchError::InvalidArgument(
            "search word consists of one minus".into(),
        ));
    }
    if text.starts_with("--") {
        return Err(SearchError::InvalidArgument("two minuses before word".into()));
    }
    if contains_restricted_symbols(text) {
        return Err(SearchError::InvalidArgument(
            "word contains restricted symbols".into(),
        ));
    }
    let (data, is_minus) = match text.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    Ok(QueryWord {
        data,
        is_minus,
        is_stop: stop_words.contains(data),
    })
}

/// Classify every token of `raw_query` into plus/minus sets, dropping
/// stop words after the minus prefix is stripped.
pub(crate) fn parse_query(raw_query: &str, stop_words: &StopWordSet) -> Result<Query> {
    let mut query = Query::default();
    for word in split_into_words(raw_query) {
        let parsed = parse_query_word(word, stop_words)?;
        if parsed.is_stop {
            continue;
        }
        if parsed.is_minus {
            query.minus_words.insert(parsed.data.to_string());
        } else {
            query.plus_words.insert(parsed.data.to_string());
        }
    }
    Ok(query)
}
