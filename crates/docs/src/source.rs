//! Where raw documents come from.
//!
//! Discovering files and fetching bytes happen outside this crate; a source
//! only hands the loader a snapshot of `(path, text)` pairs.

use crate::record::RawDocument;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Supplies the raw documents the loader indexes.
pub trait DocumentSource: Send + Sync {
    /// Snapshot of every document. Order does not matter.
    fn documents(&self) -> Vec<RawDocument>;
}

impl DocumentSource for Vec<RawDocument> {
    fn documents(&self) -> Vec<RawDocument> {
        self.clone()
    }
}

impl DocumentSource for HashMap<String, String> {
    fn documents(&self) -> Vec<RawDocument> {
        self.iter()
            .map(|(path, text)| RawDocument::new(path.as_str(), text.as_str()))
            .collect()
    }
}

impl DocumentSource for BTreeMap<String, String> {
    fn documents(&self) -> Vec<RawDocument> {
        self.iter()
            .map(|(path, text)| RawDocument::new(path.as_str(), text.as_str()))
            .collect()
    }
}

impl<S: DocumentSource + ?Sized> DocumentSource for Arc<S> {
    fn documents(&self) -> Vec<RawDocument> {
        (**self).documents()
    }
}

/// Adapts a closure into a [`DocumentSource`].
///
/// The closure runs each time the loader rebuilds its index.
pub struct SourceFn<F>(pub F);

impl<F> DocumentSource for SourceFn<F>
where
    F: Fn() -> Vec<RawDocument> + Send + Sync,
{
    fn documents(&self) -> Vec<RawDocument> {
        (self.0)()
    }
}

impl<F> std::fmt::Debug for SourceFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFn").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(source: &dyn DocumentSource) -> Vec<String> {
        let mut paths: Vec<String> = source.documents().into_iter().map(|d| d.path).collect();
        paths.sort();
        paths
    }

    #[test]
    fn map_sources() {
        let mut hash = HashMap::new();
        hash.insert("/docs/b.md".to_string(), "B".to_string());
        hash.insert("/docs/a.md".to_string(), "A".to_string());
        assert_eq!(paths(&hash), vec!["/docs/a.md", "/docs/b.md"]);

        let tree: BTreeMap<String, String> = hash.into_iter().collect();
        assert_eq!(paths(&tree), vec!["/docs/a.md", "/docs/b.md"]);
    }

    #[test]
    fn closure_source_runs_on_every_call() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let source = SourceFn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            vec![RawDocument::new("/docs/a.md", "A")]
        });

        assert_eq!(source.documents().len(), 1);
        assert_eq!(source.documents().len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn shared_source() {
        let source: Arc<Vec<RawDocument>> = Arc::new(vec![RawDocument::new("/docs/a.md", "A")]);
        assert_eq!(paths(&source), vec!["/docs/a.md"]);
    }
}
