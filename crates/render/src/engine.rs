//! The Markdown engine: parse, run passes, serialize.

use crate::code_block::{CodeBlock, CodeBlockFormatter};
use crate::highlight::{Highlighter, default_highlighter};
use crate::html;
use crate::options::RenderOptions;
use crate::passes::PassPipeline;
use crate::toc::{TocEntry, extract_toc};
use crate::token::{ParsedDocument, tokenize};
use docblog_core::{Frontmatter, MarkflowError, parse_frontmatter, parse_mdast};
use serde::Serialize;

/// Frontmatter, HTML and outline of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    /// Frontmatter metadata.
    pub meta: Frontmatter,
    /// Rendered body.
    pub html: String,
    /// Level 2 and 3 headings.
    pub toc: Vec<TocEntry>,
}

/// Renders Markdown into HTML through a fixed pipeline:
/// parse, callout pass, heading-anchor pass, serialization.
///
/// ```
/// use docblog_render::{MarkdownEngine, RenderOptions};
///
/// let engine = MarkdownEngine::new(RenderOptions::default());
/// let html = engine.render("> [!TIP]\n> Cache it.\n").unwrap();
/// assert!(html.starts_with(r#"<div class="callout callout-tip">"#));
/// ```
pub struct MarkdownEngine {
    options: RenderOptions,
    highlighter: Box<dyn Highlighter>,
    passes: PassPipeline,
}

impl MarkdownEngine {
    /// Creates an engine with the default highlighter.
    pub fn new(options: RenderOptions) -> Self {
        let passes = PassPipeline::standard(&options);
        Self {
            options,
            highlighter: default_highlighter(),
            passes,
        }
    }

    /// Replaces the highlighter.
    pub fn with_highlighter<H: Highlighter + 'static>(mut self, highlighter: H) -> Self {
        self.highlighter = Box::new(highlighter);
        self
    }

    /// Options the engine was built with.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Parses and runs all passes, stopping before serialization.
    pub fn parse_tokens(&self, markdown: &str) -> Result<ParsedDocument, MarkflowError> {
        let root = parse_mdast(markdown, &self.options.parse_options())?;
        let mut doc = tokenize(&root, markdown);
        doc.tokens = self.passes.run(std::mem::take(&mut doc.tokens));
        Ok(doc)
    }

    /// Serializes tokens produced by [`Self::parse_tokens`].
    pub fn render_tokens(&self, doc: &ParsedDocument) -> String {
        html::render_document(doc, &self.options, self.formatter())
    }

    /// Full pipeline: Markdown in, HTML out.
    pub fn render(&self, markdown: &str) -> Result<String, MarkflowError> {
        let doc = self.parse_tokens(markdown)?;
        Ok(self.render_tokens(&doc))
    }

    /// Outline of level 2 and 3 headings.
    pub fn toc(&self, markdown: &str) -> Result<Vec<TocEntry>, MarkflowError> {
        Ok(extract_toc(&self.parse_tokens(markdown)?.tokens))
    }

    /// Splits frontmatter, then renders and outlines the body from one parse.
    pub fn render_document(&self, raw: &str) -> Result<RenderedDocument, MarkflowError> {
        let split = parse_frontmatter(raw);
        let doc = self.parse_tokens(split.content)?;
        Ok(RenderedDocument {
            html: self.render_tokens(&doc),
            toc: extract_toc(&doc.tokens),
            meta: split.meta,
        })
    }

    /// Formats a single fenced block the way [`Self::render`] does.
    pub fn format_code_block(&self, code: &str, lang: Option<&str>) -> CodeBlock {
        self.formatter().format(code, lang)
    }

    fn formatter(&self) -> CodeBlockFormatter<'_> {
        CodeBlockFormatter::new(self.highlighter.as_ref(), self.options.collapse_threshold)
    }
}

impl Default for MarkdownEngine {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl std::fmt::Debug for MarkdownEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownEngine")
            .field("options", &self.options)
            .field("highlighter", &self.highlighter.name())
            .field("passes", &self.passes)
            .finish()
    }
}
