use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::document::{DocumentId, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::stop_words::StopWordSet;
use crate::tokenizer::{contains_restricted_symbols, split_into_words};

pub type TermId = u32;

#[derive(Debug, Clone, Copy)]
pub(crate) struct DocumentData {
    pub rating: i32,
    pub status: DocumentStatus,
}

/// Inverted index over an in-memory document set.
///
/// Terms are interned to dense `TermId`s; the forward map (term to
/// postings) and the reverse map (document to term frequencies) are kept
/// consistent by every mutation. Term frequencies are occurrence counts
/// normalized by document word count, so each document's row sums to 1.
#[derive(Debug, Default)]
pub struct SearchIndex {
    pub(crate) stop_words: StopWordSet,
    dictionary: HashMap<String, TermId>,
    terms: Vec<String>,
    pub(crate) postings: HashMap<TermId, BTreeMap<DocumentId, f64>>,
    pub(crate) doc_terms: BTreeMap<DocumentId, BTreeMap<TermId, f64>>,
    pub(crate) documents: BTreeMap<DocumentId, DocumentData>,
}

impl SearchIndex {
    pub fn new(stop_words: StopWordSet) -> Self {
        Self {
            stop_words,
            ..Self::default()
        }
    }

    /// Convenience constructor from a whitespace-separated stop-word
    /// string.
    pub fn with_stop_words_text(stop_words_text: &str) -> Result<Self> {
        Ok(Self::new(StopWordSet::from_text(stop_words_text)?))
    }

    /// Index a document. Fails without side effects on a negative or
    /// already-known id, or on text containing restricted symbols.
    pub fn add_document(
        &mut self,
        document_id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if document_id < 0 {
            return Err(SearchError::InvalidArgument(format!(
                "negative document id {document_id}"
            )));
        }
        if self.documents.contains_key(&document_id) {
            return Err(SearchError::InvalidArgument(format!(
                "document id {document_id} already exists"
            )));
        }
        if contains_restricted_symbols(text) {
            return Err(SearchError::InvalidArgument(
                "document contains restricted symbols".into(),
            ));
        }

        let words: Vec<&str> = split_into_words(text)
            .into_iter()
            .filter(|word| !self.stop_words.contains(word))
            .collect();
        let inv_word_count = 1.0 / words.len() as f64;

        let mut term_freqs: BTreeMap<TermId, f64> = BTreeMap::new();
        for word in words {
            let term_id = self.intern(word);
            *term_freqs.entry(term_id).or_insert(0.0) += inv_word_count;
        }
        for (&term_id, &freq) in &term_freqs {
            self.postings.entry(term_id).or_default().insert(document_id, freq);
        }

        tracing::debug!(document_id, terms = term_freqs.len(), "document indexed");
        self.doc_terms.insert(document_id, term_freqs);
        self.documents.insert(
            document_id,
            DocumentData {
                rating: average_rating(ratings),
                status,
            },
        );
        Ok(())
    }

    /// Remove a document from every structure it appears in. Unknown ids
    /// are a silent no-op. Posting lists that become empty are dropped so
    /// a term is never present with no postings.
    pub fn remove_document(&mut self, document_id: DocumentId) {
        let Some(term_freqs) = self.doc_terms.remove(&document_id) else {
            return;
        };
        for term_id in term_freqs.keys() {
            let emptied = match self.postings.get_mut(term_id) {
                Some(posting) => {
                    posting.remove(&document_id);
                    posting.is_empty()
                }
                None => false,
            };
            if emptied {
                self.postings.remove(term_id);
            }
        }
        self.documents.remove(&document_id);
        tracing::debug!(document_id, "document removed");
    }

    /// Parallel variant of [`remove_document`](Self::remove_document):
    /// the per-term erasure fans out across rayon workers and joins
    /// before the metadata is dropped, so the operation stays a single
    /// logical write.
    pub fn remove_document_par(&mut self, document_id: DocumentId) {
        let Some(term_freqs) = self.doc_terms.remove(&document_id) else {
            return;
        };
        let affected: HashSet<TermId> = term_freqs.into_keys().collect();
        self.postings.par_iter_mut().for_each(|(term_id, posting)| {
            if affected.contains(term_id) {
                posting.remove(&document_id);
            }
        });
        for term_id in &affected {
            if self.postings.get(term_id).is_some_and(BTreeMap::is_empty) {
                self.postings.remove(term_id);
            }
        }
        self.documents.remove(&document_id);
        tracing::debug!(document_id, "document removed");
    }

    /// Term frequencies of one document, keyed by term text. Empty for
    /// unknown ids, never an error.
    pub fn word_frequencies(&self, document_id: DocumentId) -> BTreeMap<&str, f64> {
        match self.doc_terms.get(&document_id) {
            Some(term_freqs) => term_freqs
                .iter()
                .map(|(&term_id, &freq)| (self.terms[term_id as usize].as_str(), freq))
                .collect(),
            None => BTreeMap::new(),
        }
    }

    /// Live document ids in ascending order.
    pub fn document_ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.documents.keys().copied()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn contains_document(&self, document_id: DocumentId) -> bool {
        self.documents.contains_key(&document_id)
    }

    fn intern(&mut self, word: &str) -> TermId {
        if let Some(&term_id) = self.dictionary.get(word) {
            return term_id;
        }
        let term_id = self.terms.len() as TermId;
        self.dictionary.insert(word.to_string(), term_id);
        self.terms.push(word.to_string());
        term_id
    }

    pub(crate) fn term_postings(&self, word: &str) -> Option<&BTreeMap<DocumentId, f64>> {
        self.dictionary.get(word).and_then(|term_id| self.postings.get(term_id))
    }

    pub(crate) fn has_posting(&self, word: &str, document_id: DocumentId) -> bool {
        self.term_postings(word)
            .is_some_and(|posting| posting.contains_key(&document_id))
    }

    pub(crate) fn inverse_document_freq(&self, posting_len: usize) -> f64 {
        (self.documents.len() as f64 / posting_len as f64).ln()
    }
}

fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    ratings.iter().sum::<i32>() / ratings.len() as i32
}
