//! Syntax highlighting seam used by the code-block formatter.
//!
//! A highlighter is an external tokenizer keyed by language tag. The
//! formatter asks whether a tag is supported, falls back to `text` when it is
//! not, and escapes the code itself when highlighting fails.

#[cfg(feature = "syntect")]
mod syntect;

#[cfg(feature = "syntect")]
pub use self::syntect::SyntectHighlighter;

use thiserror::Error;

/// Errors a highlighter backend can report.
#[derive(Debug, Error)]
pub enum HighlightError {
    /// The backend has no grammar for the tag.
    #[error("Language '{0}' is not supported by this highlighter")]
    UnsupportedLanguage(String),
    /// The backend failed while tokenizing.
    #[error("Highlighting failed: {0}")]
    HighlightingFailed(String),
}

/// Turns source code into escaped, tagged HTML.
pub trait Highlighter: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// True when the backend has a grammar for `lang`.
    fn supports(&self, lang: &str) -> bool;

    /// Highlights `code`; the result must already be HTML-escaped.
    fn highlight(&self, code: &str, lang: &str) -> Result<String, HighlightError>;
}

/// Highlighter without grammars: every block renders as escaped `text`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn supports(&self, _lang: &str) -> bool {
        false
    }

    fn highlight(&self, code: &str, _lang: &str) -> Result<String, HighlightError> {
        Ok(escape_code(code))
    }
}

/// Escapes code for a `<code>` element body.
pub fn escape_code(code: &str) -> String {
    html_escape::encode_text(code).into_owned()
}

/// Highlighter used when none is configured.
pub fn default_highlighter() -> Box<dyn Highlighter> {
    #[cfg(feature = "syntect")]
    {
        Box::new(SyntectHighlighter::new())
    }
    #[cfg(not(feature = "syntect"))]
    {
        Box::new(PlainHighlighter)
    }
}
