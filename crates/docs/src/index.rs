//! Immutable snapshot built from one pass over a source.

use crate::config::LoaderOptions;
use crate::record::{DocumentRecord, RawDocument};
use crate::tree::{TreeNode, build_tree};
use rayon::prelude::*;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

/// Sorted records, the route index and the navigation tree.
#[derive(Debug, Clone, Default)]
pub struct DocumentIndex {
    docs: Vec<Arc<DocumentRecord>>,
    routes: HashMap<String, usize>,
    tree: Vec<TreeNode>,
}

impl DocumentIndex {
    /// Builds records in parallel, then sorts by route (code point order,
    /// source path on ties) and indexes routes. When two sources map to the
    /// same route the first in sort order serves it.
    pub fn build(raw: Vec<RawDocument>, options: &LoaderOptions) -> Self {
        let mut docs: Vec<DocumentRecord> = raw
            .par_iter()
            .map(|doc| DocumentRecord::from_raw(doc, &options.docs_root))
            .collect();
        docs.sort_by(|a, b| a.link.cmp(&b.link).then_with(|| a.raw_path.cmp(&b.raw_path)));

        let mut routes: HashMap<String, usize> = HashMap::with_capacity(docs.len());
        for (position, doc) in docs.iter().enumerate() {
            match routes.entry(doc.link.clone()) {
                Entry::Occupied(owner) => log::warn!(
                    "Route `{}` from `{}` is already served by `{}`",
                    doc.link,
                    doc.raw_path,
                    docs[*owner.get()].raw_path
                ),
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
            }
        }

        let tree = build_tree(&docs);
        log::debug!(
            "Indexed {} documents ({} routes, {} top-level directories)",
            docs.len(),
            routes.len(),
            tree.len()
        );

        Self {
            docs: docs.into_iter().map(Arc::new).collect(),
            routes,
            tree,
        }
    }

    /// Records in canonical order.
    pub fn docs(&self) -> &[Arc<DocumentRecord>] {
        &self.docs
    }

    /// Exact lookup of an already normalized route.
    pub fn get(&self, link: &str) -> Option<&Arc<DocumentRecord>> {
        self.routes.get(link).map(|&position| &self.docs[position])
    }

    /// Navigation tree.
    pub fn tree(&self) -> &[TreeNode] {
        &self.tree
    }

    /// Number of records, duplicates included.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// True when the source was empty.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
