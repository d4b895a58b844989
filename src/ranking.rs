use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::concurrent::ConcurrentMap;
use crate::document::{Document, DocumentId, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::index::SearchIndex;
use crate::query::{parse_query, Query};

/// Result lists are truncated to this many documents.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevance differences below this are treated as ties and broken by
/// rating.
const RELEVANCE_EPSILON: f64 = 1e-6;

const ACCUMULATOR_BUCKETS: usize = 16;

impl SearchIndex {
    /// Top documents with status `Actual`.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with_status(raw_query, DocumentStatus::Actual)
    }

    /// Top documents with the given status.
    pub fn find_top_documents_with_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by(raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    /// Top documents passing an arbitrary `(id, status, rating)`
    /// predicate, sorted by relevance descending (rating breaks ties) and
    /// truncated to [`MAX_RESULT_DOCUMENT_COUNT`].
    pub fn find_top_documents_by<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let query = parse_query(raw_query, &self.stop_words)?;
        let mut matched = self.find_all_documents(&query, predicate);
        sort_and_truncate(&mut matched);
        Ok(matched)
    }

    pub fn find_top_documents_par(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with_status_par(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_with_status_par(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by_par(raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    /// Parallel counterpart of
    /// [`find_top_documents_by`](Self::find_top_documents_by). Plus terms
    /// are scored across rayon workers into a sharded accumulator; the
    /// index is read-only for the duration of the call.
    pub fn find_top_documents_by_par<P>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = parse_query(raw_query, &self.stop_words)?;
        let mut matched = self.find_all_documents_par(&query, predicate);
        sort_and_truncate(&mut matched);
        Ok(matched)
    }

    /// Plus terms of the query present in the document, sorted ascending.
    /// Any minus term present empties the match; the status is still
    /// returned. Unknown ids always fail with
    /// [`SearchError::OutOfRange`], checked before the query is parsed.
    pub fn match_document(
        &self,
        raw_query: &str,
        document_id: DocumentId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let status = self.document_status(document_id)?;
        let query = parse_query(raw_query, &self.stop_words)?;
        for word in &query.minus_words {
            if self.has_posting(word, document_id) {
                return Ok((Vec::new(), status));
            }
        }
        let matched = query
            .plus_words
            .into_iter()
            .filter(|word| self.has_posting(word, document_id))
            .collect();
        Ok((matched, status))
    }

    /// Parallel counterpart of [`match_document`](Self::match_document)
    /// with the same contract.
    pub fn match_document_par(
        &self,
        raw_query: &str,
        document_id: DocumentId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let status = self.document_status(document_id)?;
        let query = parse_query(raw_query, &self.stop_words)?;
        if query
            .minus_words
            .par_iter()
            .any(|word| self.has_posting(word, document_id))
        {
            return Ok((Vec::new(), status));
        }
        let mut matched: Vec<String> = query
            .plus_words
            .into_par_iter()
            .filter(|word| self.has_posting(word, document_id))
            .collect();
        matched.sort_unstable();
        Ok((matched, status))
    }

    fn document_status(&self, document_id: DocumentId) -> Result<DocumentStatus> {
        self.documents
            .get(&document_id)
            .map(|data| data.status)
            .ok_or(SearchError::OutOfRange(document_id))
    }

    fn find_all_documents<P>(&self, query: &Query, predicate: P) -> Vec<Document>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let mut relevance: BTreeMap<DocumentId, f64> = BTreeMap::new();
        for word in &query.plus_words {
            let Some(postings) = self.term_postings(word) else {
                continue;
            };
            let idf = self.inverse_document_freq(postings.len());
            for (&document_id, &term_freq) in postings {
                let Some(data) = self.documents.get(&document_id) else {
                    continue;
                };
                if predicate(document_id, data.status, data.rating) {
                    *relevance.entry(document_id).or_insert(0.0) += term_freq * idf;
                }
            }
        }
        // Minus terms exclude unconditionally, predicate or not.
        for word in &query.minus_words {
            let Some(postings) = self.term_postings(word) else {
                continue;
            };
            for &document_id in postings.keys() {
                relevance.remove(&document_id);
            }
        }
        self.materialize(relevance)
    }

    fn find_all_documents_par<P>(&self, query: &Query, predicate: P) -> Vec<Document>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let accumulator = ConcurrentMap::new(ACCUMULATOR_BUCKETS);
        query.plus_words.par_iter().for_each(|word| {
            let Some(postings) = self.term_postings(word) else {
                return;
            };
            let idf = self.inverse_document_freq(postings.len());
            for (&document_id, &term_freq) in postings {
                let Some(data) = self.documents.get(&document_id) else {
                    continue;
                };
                if predicate(document_id, data.status, data.rating) {
                    accumulator.add(document_id, term_freq * idf);
                }
            }
        });
        // All plus-term writers have joined; erasure only races with
        // erasure, which the shard mutexes cover.
        query.minus_words.par_iter().for_each(|word| {
            let Some(postings) = self.term_postings(word) else {
                return;
            };
            for &document_id in postings.keys() {
                accumulator.erase(document_id);
            }
        });
        self.materialize(accumulator.into_map())
    }

    fn materialize(&self, relevance: BTreeMap<DocumentId, f64>) -> Vec<Document> {
        relevance
            .into_iter()
            .filter_map(|(document_id, relevance)| {
                self.documents
                    .get(&document_id)
                    .map(|data| Document::new(document_id, relevance, data.rating))
            })
            .collect()
    }
}

fn sort_and_truncate(documents: &mut Vec<Document>) {
    documents.sort_by(|lhs, rhs| {
        if (lhs.relevance - rhs.relevance).abs() < RELEVANCE_EPSILON {
            rhs.rating.cmp(&lhs.rating)
        } else {
            rhs.relevance
                .partial_cmp(&lhs.relevance)
                .unwrap_or(Ordering::Equal)
        }
    });
    documents.truncate(MAX_RESULT_DOCUMENT_COUNT);
}

/// Evaluate a batch of queries in parallel over a read-only index,
/// returning one ranked result list per query.
pub fn process_queries(index: &SearchIndex, queries: &[String]) -> Result<Vec<Vec<Document>>> {
    queries
        .par_iter()
        .map(|query| index.find_top_documents(query))
        .collect()
}

/// [`process_queries`] flattened into a single hit list, query order
/// preserved.
pub fn process_queries_joined(index: &SearchIndex, queries: &[String]) -> Result<Vec<Document>> {
    Ok(process_queries(index, queries)?.into_iter().flatten().collect())
}
