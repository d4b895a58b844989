//! In-memory full-text search over a mutable document set.
//!
//! Documents are split on ASCII spaces, filtered against a stop-word set,
//! and stored in an inverted index with term frequencies normalized by
//! document length. Queries combine inclusion terms with `-`-prefixed
//! exclusion terms and are ranked by classic TF-IDF; results are capped at
//! [`ranking::MAX_RESULT_DOCUMENT_COUNT`]. Every query path has a
//! rayon-backed parallel variant that treats the index as a read-only
//! snapshot for the duration of the call.

pub mod concurrent;
pub mod dedup;
pub mod document;
pub mod error;
pub mod index;
mod query;
pub mod ranking;
pub mod stop_words;
pub mod tokenizer;

pub use concurrent::ConcurrentMap;
pub use dedup::find_and_remove_duplicates;
pub use document::{Document, DocumentId, DocumentStatus};
pub use error::{Result, SearchError};
pub use index::{SearchIndex, TermId};
pub use ranking::{process_queries, process_queries_joined, MAX_RESULT_DOCUMENT_COUNT};
pub use stop_words::StopWordSet;
