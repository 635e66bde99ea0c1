//! Collapsible code-block fragments.
//!
//! Copy and expand buttons carry no behaviour: the UI layer wires them up
//! from the `data-*` attributes on the wrapper.

use crate::highlight::{Highlighter, escape_code};
use html_escape::encode_double_quoted_attribute;
use serde::Serialize;

/// Language shown when the tag is missing or unknown.
pub const FALLBACK_LANGUAGE: &str = "text";

/// Default number of lines above which a block starts collapsed.
pub const DEFAULT_COLLAPSE_THRESHOLD: usize = 40;

/// A formatted fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Resolved language tag (`text` when unknown).
    pub language: String,
    /// Source lines, trailing blank lines excluded.
    pub line_count: usize,
    /// Whether the block starts collapsed.
    pub collapsed: bool,
    /// Complete HTML fragment.
    pub html: String,
}

/// Renders fenced code through a highlighter into the wrapper markup.
pub struct CodeBlockFormatter<'h> {
    highlighter: &'h dyn Highlighter,
    collapse_threshold: usize,
}

impl<'h> CodeBlockFormatter<'h> {
    /// Creates a formatter; blocks longer than `collapse_threshold` lines collapse.
    pub fn new(highlighter: &'h dyn Highlighter, collapse_threshold: usize) -> Self {
        Self {
            highlighter,
            collapse_threshold,
        }
    }

    /// Resolves a fence language tag against the highlighter.
    pub fn resolve_language(&self, lang: Option<&str>) -> String {
        match lang.map(str::trim) {
            Some(tag) if !tag.is_empty() && self.highlighter.supports(tag) => tag.to_string(),
            _ => FALLBACK_LANGUAGE.to_string(),
        }
    }

    /// Formats one fenced block. Never fails: highlighter errors degrade to
    /// escaped text.
    pub fn format(&self, code: &str, lang: Option<&str>) -> CodeBlock {
        let language = self.resolve_language(lang);
        let highlighted = self.highlight(code, &language);
        let line_count = count_lines(code);
        let collapsed = line_count > self.collapse_threshold;
        let html = wrap(&highlighted, &language, line_count, collapsed);

        CodeBlock {
            language,
            line_count,
            collapsed,
            html,
        }
    }

    fn highlight(&self, code: &str, language: &str) -> String {
        if language == FALLBACK_LANGUAGE {
            return escape_code(code);
        }
        match self.highlighter.highlight(code, language) {
            Ok(html) => html,
            Err(err) => {
                log::warn!(
                    "{} highlighter failed for `{}`, using plain text: {}",
                    self.highlighter.name(),
                    language,
                    err
                );
                escape_code(code)
            }
        }
    }
}

/// Lines in `code` once trailing whitespace is trimmed; empty code is one line.
pub fn count_lines(code: &str) -> usize {
    code.trim_end().split('\n').count()
}

fn wrap(highlighted: &str, language: &str, line_count: usize, collapsed: bool) -> String {
    let lang = encode_double_quoted_attribute(language);
    let wrapper_class = if collapsed {
        "code-block-wrapper collapsed"
    } else {
        "code-block-wrapper"
    };

    let mut html = String::with_capacity(highlighted.len() + 640);
    html.push_str(&format!(
        r#"<div class="{wrapper_class}" data-lines="{line_count}" data-lang="{lang}" data-collapsed="{collapsed}">"#
    ));
    html.push_str(r#"<div class="code-block-header">"#);
    html.push_str(r#"<div class="code-mac-dots"></div>"#);
    html.push_str(r#"<div class="code-actions">"#);
    html.push_str(&format!(r#"<span class="code-lang-tag">{lang}</span>"#));
    html.push_str(r#"<button class="code-copy-btn" aria-label="Copy code">"#);
    html.push_str(r#"<span class="material-icons-round icon-copy">content_copy</span>"#);
    html.push_str(r#"<span class="copy-status">Copied!</span>"#);
    html.push_str("</button></div></div>");
    html.push_str(r#"<div class="code-scroll-container">"#);
    html.push_str(&format!(
        r#"<pre><code class="hljs language-{lang}">{highlighted}</code></pre>"#
    ));
    html.push_str("</div>");
    if collapsed {
        html.push_str(r#"<div class="code-expand-overlay">"#);
        html.push_str(r#"<button class="code-expand-btn" title="Toggle code visibility">"#);
        html.push_str(r#"<span class="material-icons-round expand-icon">unfold_more</span>"#);
        html.push_str(&format!(
            r#"<span class="expand-text">Show All ({line_count} lines)</span>"#
        ));
        html.push_str("</button></div>");
    }
    html.push_str("</div>");
    html
}
