//! A configured site: loader, engine and settings in one place.

use crate::config::SiteConfig;
use crate::loader::DocumentLoader;
use crate::record::DocumentRecord;
use crate::source::DocumentSource;
use crate::tree::TreeNode;
use docblog_core::MarkflowError;
use docblog_render::{MarkdownEngine, TocEntry, extract_toc};
use serde::Serialize;
use std::sync::Arc;

/// A rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// The document behind the page.
    pub record: DocumentRecord,
    /// Rendered body.
    pub html: String,
    /// Level 2 and 3 headings of the body.
    pub toc: Vec<TocEntry>,
}

/// Serves rendered pages and navigation for one document source.
pub struct Site<S> {
    config: SiteConfig,
    loader: DocumentLoader<S>,
    engine: MarkdownEngine,
}

impl<S: DocumentSource> Site<S> {
    /// Builds a site whose loader and engine follow `config`.
    pub fn new(source: S, config: SiteConfig) -> Self {
        let loader = DocumentLoader::with_options(source, config.docs.clone());
        let engine = MarkdownEngine::new(config.render.clone());
        Self {
            config,
            loader,
            engine,
        }
    }

    /// Replaces the engine, e.g. to plug in another highlighter.
    pub fn with_engine(mut self, engine: MarkdownEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Site settings.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// The document loader.
    pub fn loader(&self) -> &DocumentLoader<S> {
        &self.loader
    }

    /// The Markdown engine.
    pub fn engine(&self) -> &MarkdownEngine {
        &self.engine
    }

    /// Renders the document at `route`; `Ok(None)` when nothing is served there.
    pub fn page(&self, route: &str) -> Result<Option<Page>, MarkflowError> {
        let Some(record) = self.loader.doc_by_route(route) else {
            return Ok(None);
        };
        self.render_record(&record).map(Some)
    }

    /// Navigation tree.
    pub fn navigation(&self) -> Vec<TreeNode> {
        self.loader.doc_tree()
    }

    /// Documents matching `query`; nothing when search is disabled.
    pub fn search(&self, query: &str) -> Vec<Arc<DocumentRecord>> {
        if !self.config.search.enabled {
            return Vec::new();
        }
        self.loader.search(query)
    }

    /// Forgets cached documents so the next request reloads the source.
    pub fn reload(&self) {
        self.loader.invalidate();
    }

    fn render_record(&self, record: &DocumentRecord) -> Result<Page, MarkflowError> {
        let doc = self
            .engine
            .parse_tokens(record.body())
            .map_err(|err| err.with_file(record.raw_path.as_str()))?;
        Ok(Page {
            html: self.engine.render_tokens(&doc),
            toc: extract_toc(&doc.tokens),
            record: record.clone(),
        })
    }
}

impl<S> std::fmt::Debug for Site<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("config", &self.config)
            .field("loader", &self.loader)
            .field("engine", &self.engine)
            .finish()
    }
}
