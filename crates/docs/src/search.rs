//! Case-insensitive substring search over titles and bodies.

use crate::record::DocumentRecord;
use std::sync::Arc;

/// Records whose title or body contains `query`, in the order given.
/// A blank query matches nothing.
pub fn search(docs: &[Arc<DocumentRecord>], query: &str) -> Vec<Arc<DocumentRecord>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    docs.iter()
        .filter(|doc| matches(doc, &needle))
        .cloned()
        .collect()
}

fn matches(doc: &DocumentRecord, needle: &str) -> bool {
    doc.title.to_lowercase().contains(needle) || doc.body().to_lowercase().contains(needle)
}
