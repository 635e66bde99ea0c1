//! The cached document loader.

use crate::config::LoaderOptions;
use crate::index::DocumentIndex;
use crate::record::DocumentRecord;
use crate::route::{normalize_dir, normalize_route};
use crate::search;
use crate::source::DocumentSource;
use crate::tree::TreeNode;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Loads documents from a [`DocumentSource`] on first use and serves lookups
/// from the cached [`DocumentIndex`] until [`invalidate`](Self::invalidate)
/// is called.
///
/// The first access builds the index while holding the cache lock, so
/// concurrent callers wait for one build and then share its result. A
/// finished index is never modified; a rebuild publishes a new one.
///
/// ```
/// use docblog_docs::{DocumentLoader, RawDocument};
///
/// let loader = DocumentLoader::new(vec![
///     RawDocument::new("/docs/guide/index.md", "---\ntitle: Guide\n---\n"),
///     RawDocument::new("/docs/guide/intro.md", "# Intro\n"),
/// ]);
/// assert_eq!(loader.doc_by_route("/guide/").unwrap().title, "Guide");
/// assert_eq!(loader.docs_in_dir("/guide").len(), 1);
/// ```
pub struct DocumentLoader<S> {
    source: S,
    options: LoaderOptions,
    cache: Mutex<Option<Arc<DocumentIndex>>>,
}

impl<S: DocumentSource> DocumentLoader<S> {
    /// Creates an uncached loader with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, LoaderOptions::default())
    }

    /// Creates an uncached loader.
    pub fn with_options(source: S, options: LoaderOptions) -> Self {
        Self {
            source,
            options,
            cache: Mutex::new(None),
        }
    }

    /// Loader settings.
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current index, building it if the cache is empty.
    pub fn index(&self) -> Arc<DocumentIndex> {
        let mut cache = self.lock();
        if let Some(index) = cache.as_ref() {
            return Arc::clone(index);
        }

        log::debug!("Building document index");
        let index = Arc::new(DocumentIndex::build(self.source.documents(), &self.options));
        *cache = Some(Arc::clone(&index));
        index
    }

    /// True once an index has been built and not invalidated since.
    pub fn is_cached(&self) -> bool {
        self.lock().is_some()
    }

    /// Drops the cached index; the next access rebuilds from the source.
    /// Snapshots already handed out stay valid.
    pub fn invalidate(&self) {
        if self.lock().take().is_some() {
            log::debug!("Document index invalidated");
        }
    }

    /// Every record in canonical order.
    pub fn flat_docs(&self) -> Vec<Arc<DocumentRecord>> {
        self.index().docs().to_vec()
    }

    /// Record served at `route`. A trailing slash is ignored and
    /// percent-escapes are decoded.
    pub fn doc_by_route(&self, route: &str) -> Option<Arc<DocumentRecord>> {
        self.index().get(&normalize_route(route)).cloned()
    }

    /// Raw text served at `route`.
    pub fn content_by_route(&self, route: &str) -> Option<String> {
        self.doc_by_route(route).map(|doc| doc.content.clone())
    }

    /// Every record strictly below `dir`, in canonical order. `/` returns
    /// all records.
    pub fn docs_in_dir(&self, dir: &str) -> Vec<Arc<DocumentRecord>> {
        let prefix = format!("{}/", normalize_dir(dir));
        self.index()
            .docs()
            .iter()
            .filter(|doc| doc.link.starts_with(&prefix))
            .cloned()
            .collect()
    }

    /// Navigation tree.
    pub fn doc_tree(&self) -> Vec<TreeNode> {
        self.index().tree().to_vec()
    }

    /// Route to raw text for every served route.
    pub fn all_docs(&self) -> BTreeMap<String, String> {
        let index = self.index();
        index
            .docs()
            .iter()
            .filter_map(|doc| {
                index
                    .get(&doc.link)
                    .filter(|owner| Arc::ptr_eq(owner, doc))
                    .map(|_| (doc.link.clone(), doc.content.clone()))
            })
            .collect()
    }

    /// Records whose title or body contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<Arc<DocumentRecord>> {
        search::search(self.index().docs(), query)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<DocumentIndex>>> {
        // A panicking source leaves the slot empty, so the data is still usable.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> std::fmt::Debug for DocumentLoader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self
            .cache
            .lock()
            .map(|cache| cache.is_some())
            .unwrap_or(false);
        f.debug_struct("DocumentLoader")
            .field("options", &self.options)
            .field("cached", &cached)
            .finish_non_exhaustive()
    }
}
