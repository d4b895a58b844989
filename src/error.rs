use thiserror::Error;

use crate::document::DocumentId;

/// Errors raised by index construction, mutation, and query parsing.
///
/// All validation happens synchronously at the offending call; a failed
/// `add_document` leaves the index untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Malformed input: negative or duplicate document id, restricted
    /// symbols in text, or a bad query token.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Lookup of a document id the index does not know.
    #[error("unknown document id {0}")]
    OutOfRange(DocumentId),
}

pub type Result<T> = std::result::Result<T, SearchError>;
