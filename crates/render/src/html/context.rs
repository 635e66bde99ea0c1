//! Output buffer and per-document state for HTML serialization.

use crate::code_block::CodeBlockFormatter;
use crate::options::RenderOptions;
use crate::token::{FootnoteIndex, LinkDefinition};
use crate::typography::apply_typography;
use html_escape::encode_double_quoted_attribute;
use std::collections::HashMap;

/// Serialization state for one document.
pub struct Context<'a> {
    html: String,
    options: &'a RenderOptions,
    definitions: &'a HashMap<String, LinkDefinition>,
    footnotes: &'a FootnoteIndex,
    formatter: CodeBlockFormatter<'a>,
    footnote_refs_seen: HashMap<usize, usize>,
    last_char: Option<char>,
}

impl<'a> Context<'a> {
    /// Creates an empty context.
    pub fn new(
        options: &'a RenderOptions,
        definitions: &'a HashMap<String, LinkDefinition>,
        footnotes: &'a FootnoteIndex,
        formatter: CodeBlockFormatter<'a>,
    ) -> Self {
        Self {
            html: String::with_capacity(4096),
            options,
            definitions,
            footnotes,
            formatter,
            footnote_refs_seen: HashMap::new(),
            last_char: None,
        }
    }

    /// Writes markup without escaping.
    pub fn push_raw(&mut self, s: &str) {
        self.html.push_str(s);
    }

    /// Writes escaped text.
    pub fn push_text(&mut self, s: &str) {
        self.html.push_str(&encode_double_quoted_attribute(s));
        if let Some(last) = s.chars().next_back() {
            self.last_char = Some(last);
        }
    }

    /// Writes a literal text run, applying typography when enabled.
    pub fn push_prose(&mut self, s: &str) {
        if self.options.typographer {
            let text = apply_typography(s, self.last_char);
            self.push_text(&text);
        } else {
            self.push_text(s);
        }
    }

    /// Writes an escaped attribute value.
    pub fn push_attr_value(&mut self, s: &str) {
        self.html.push_str(&encode_double_quoted_attribute(s));
    }

    /// Writes ` name="value"`.
    pub fn push_attr(&mut self, name: &str, value: &str) {
        self.html.push(' ');
        self.html.push_str(name);
        self.html.push_str("=\"");
        self.push_attr_value(value);
        self.html.push('"');
    }

    /// Forgets the previous character; called at the start of each inline run.
    pub fn start_inline(&mut self) {
        self.last_char = None;
    }

    /// Rendering options.
    pub fn options(&self) -> &RenderOptions {
        self.options
    }

    /// Fenced code formatter.
    pub fn formatter(&self) -> &CodeBlockFormatter<'a> {
        &self.formatter
    }

    /// Resolves a reference-style link or image.
    pub fn definition(&self, identifier: &str) -> Option<&'a LinkDefinition> {
        self.definitions.get(identifier)
    }

    /// Number of the referenced footnote.
    pub fn footnote_ordinal(&self, identifier: &str) -> Option<usize> {
        self.footnotes.ordinal(identifier)
    }

    /// 0 for the first call site of a footnote, then 1, 2, ...
    pub fn next_footnote_ref(&mut self, ordinal: usize) -> usize {
        let seen = self.footnote_refs_seen.entry(ordinal).or_insert(0);
        let index = *seen;
        *seen += 1;
        index
    }

    /// Consumes the context, returning the HTML.
    pub fn finish(self) -> String {
        self.html
    }
}
