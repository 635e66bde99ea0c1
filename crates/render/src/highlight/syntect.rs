//! Syntect-backed highlighter emitting `hljs-` prefixed classes.

use std::sync::OnceLock;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::{HighlightError, Highlighter};

/// Highlighter using syntect's bundled grammars.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntectHighlighter;

impl SyntectHighlighter {
    /// Creates the highlighter; grammars load lazily on first use.
    pub fn new() -> Self {
        Self
    }

    fn syntax_set() -> &'static SyntaxSet {
        static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
        SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
    }
}

impl Highlighter for SyntectHighlighter {
    fn name(&self) -> &'static str {
        "syntect"
    }

    fn supports(&self, lang: &str) -> bool {
        Self::syntax_set().find_syntax_by_token(lang).is_some()
    }

    fn highlight(&self, code: &str, lang: &str) -> Result<String, HighlightError> {
        let syntax_set = Self::syntax_set();
        let syntax = syntax_set
            .find_syntax_by_token(lang)
            .ok_or_else(|| HighlightError::UnsupportedLanguage(lang.to_string()))?;

        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            syntax_set,
            ClassStyle::SpacedPrefixed { prefix: "hljs-" },
        );
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|err| HighlightError::HighlightingFailed(err.to_string()))?;
        }
        Ok(generator.finalize())
    }
}
