use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};

use crate::document::DocumentId;

/// Sharded relevance accumulator for the parallel scoring path.
///
/// Buckets are selected by `document_id mod bucket_count`, each behind its
/// own mutex, so worker tasks incrementing different documents rarely
/// contend and increments on the same document serialize without losing
/// updates. Merging back into an ordered map consumes the accumulator,
/// which guarantees all writers are done.
#[derive(Debug)]
pub struct ConcurrentMap {
    buckets: Vec<Mutex<HashMap<DocumentId, f64>>>,
}

impl ConcurrentMap {
    pub fn new(bucket_count: usize) -> Self {
        let bucket_count = bucket_count.max(1);
        Self {
            buckets: (0..bucket_count).map(|_| Mutex::new(HashMap::new())).collect(),
        }
    }

    fn bucket(&self, document_id: DocumentId) -> &Mutex<HashMap<DocumentId, f64>> {
        let slot = document_id.rem_euclid(self.buckets.len() as DocumentId);
        &self.buckets[slot as usize]
    }

    /// Add `delta` to the accumulated relevance of one document.
    pub fn add(&self, document_id: DocumentId, delta: f64) {
        *self.bucket(document_id).lock().entry(document_id).or_insert(0.0) += delta;
    }

    /// Drop a document's accumulated relevance, if any.
    pub fn erase(&self, document_id: DocumentId) {
        self.bucket(document_id).lock().remove(&document_id);
    }

    /// Merge all shards into an ordinary ordered map. Taking `self` by
    /// value makes overlapping writers a compile error.
    pub fn into_map(self) -> BTreeMap<DocumentId, f64> {
        self.buckets
            .into_iter()
            .flat_map(|bucket| bucket.into_inner())
            .collect()
    }
}
