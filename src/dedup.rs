use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::document::DocumentId;
use crate::index::{SearchIndex, TermId};

/// Remove documents whose distinct term set duplicates an earlier
/// document's. Frequencies are ignored: two documents with the same words
/// repeated differently are duplicates. The lowest id per term set
/// survives; removed ids are returned in ascending order.
pub fn find_and_remove_duplicates(index: &mut SearchIndex) -> Vec<DocumentId> {
    let mut seen: HashMap<Vec<TermId>, DocumentId> = HashMap::new();
    let mut duplicates = Vec::new();
    for (&document_id, term_freqs) in &index.doc_terms {
        let words: Vec<TermId> = term_freqs.keys().copied().collect();
        match seen.entry(words) {
            Entry::Vacant(slot) => {
                slot.insert(document_id);
            }
            Entry::Occupied(_) => duplicates.push(document_id),
        }
    }
    for &document_id in &duplicates {
        tracing::info!(document_id, "removing duplicate document");
        index.remove_document(document_id);
    }
    duplicates
}
