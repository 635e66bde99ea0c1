#![deny(missing_docs)]
//! docblog render engine: Markdown to HTML with callouts, heading anchors,
//! collapsible code blocks, task lists and footnotes.

/// Collapsible code-block formatter.
pub mod code_block;
/// Markdown engine entry points.
pub mod engine;
/// Syntax highlighting backends.
pub mod highlight;
/// HTML serialization of token streams.
pub mod html;
/// Rendering options.
pub mod options;
/// Token-stream passes.
pub mod passes;
/// Table-of-contents extraction.
pub mod toc;
/// Block token stream.
pub mod token;
/// Typographic replacements.
pub mod typography;

pub use code_block::{CodeBlock, CodeBlockFormatter};
pub use engine::{MarkdownEngine, RenderedDocument};
pub use highlight::{HighlightError, Highlighter, PlainHighlighter};
#[cfg(feature = "syntect")]
pub use highlight::SyntectHighlighter;
pub use options::RenderOptions;
pub use passes::{CalloutPass, HeadingAnchorPass, PassPipeline, TokenTransform};
pub use toc::{TocEntry, extract_toc};
pub use token::{CalloutKind, ParsedDocument, Token, TokenKind};
