//! Block-level token stream built from the markdown-rs tree.
//!
//! Block structure is flattened into open/close pairs so passes can retag
//! containers (blockquote to callout) and attach attributes (heading ids)
//! without rebuilding the tree. Phrasing content stays as mdast nodes inside
//! [`TokenKind::Inline`] tokens.

use markdown::mdast::{Node, Table};
use serde::Serialize;
use std::collections::HashMap;

/// Callout flavours recognised in `> [!TYPE]` markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutKind {
    /// `[!NOTE]`
    Note,
    /// `[!WARNING]`
    Warning,
    /// `[!TIP]`
    Tip,
    /// `[!DANGER]`
    Danger,
    /// `[!IMPORTANT]`
    Important,
    /// `[!CAUTION]`
    Caution,
}

impl CalloutKind {
    /// Parses the upper-case marker name (`NOTE`, `WARNING`, ...).
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "NOTE" => Some(Self::Note),
            "WARNING" => Some(Self::Warning),
            "TIP" => Some(Self::Tip),
            "DANGER" => Some(Self::Danger),
            "IMPORTANT" => Some(Self::Important),
            "CAUTION" => Some(Self::Caution),
            _ => None,
        }
    }

    /// Lower-case name used in the `callout-*` class.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Warning => "warning",
            Self::Tip => "tip",
            Self::Danger => "danger",
            Self::Important => "important",
            Self::Caution => "caution",
        }
    }

    /// Material icon glyph shown next to the callout body.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Note => "info",
            Self::Warning => "warning",
            Self::Tip => "lightbulb",
            Self::Danger => "dangerous",
            Self::Important => "priority_high",
            Self::Caution => "error_outline",
        }
    }
}

/// Token discriminant. Container tokens come in open/close pairs.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `<p>`
    ParagraphOpen,
    /// `</p>`
    ParagraphClose,
    /// `<hN>` with the heading depth.
    HeadingOpen(u8),
    /// `</hN>`
    HeadingClose(u8),
    /// `<blockquote>`
    BlockquoteOpen,
    /// `</blockquote>`
    BlockquoteClose,
    /// Callout container produced from a marked blockquote.
    CalloutOpen(CalloutKind),
    /// Closes a callout container.
    CalloutClose,
    /// `<ul>`/`<ol>`; `tasks` is set when any item carries a checkbox.
    ListOpen {
        /// Ordered list.
        ordered: bool,
        /// Start number of an ordered list.
        start: Option<u32>,
        /// At least one item is a task item.
        tasks: bool,
    },
    /// `</ul>`/`</ol>`
    ListClose {
        /// Ordered list.
        ordered: bool,
    },
    /// `<li>`; `checked` is `Some` for task items.
    ListItemOpen {
        /// Task item state.
        checked: Option<bool>,
    },
    /// `</li>`
    ListItemClose,
    /// Opens the `<label>` and checkbox of a task item.
    TaskLabelOpen {
        /// Whether the box is ticked.
        checked: bool,
    },
    /// Closes the task item label.
    TaskLabelClose,
    /// Phrasing content; `children` holds the mdast nodes.
    Inline,
    /// Fenced code block; `content` is the code with a trailing newline.
    Fence {
        /// First word of the info string.
        lang: Option<String>,
    },
    /// Indented code block.
    CodeBlock,
    /// Raw HTML block.
    HtmlBlock,
    /// `<hr>`
    Hr,
    /// GFM table, kept as its subtree.
    Table(Table),
    /// Start of the footnote section.
    FootnoteBlockOpen,
    /// End of the footnote section.
    FootnoteBlockClose,
    /// One footnote body.
    FootnoteOpen {
        /// 1-based number, by first reference.
        ordinal: usize,
    },
    /// End of a footnote body.
    FootnoteClose,
    /// Back-references from a footnote to its call sites.
    FootnoteAnchor {
        /// 1-based footnote number.
        ordinal: usize,
        /// How many times the footnote is referenced.
        refs: usize,
    },
}

/// One element of the flat block stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What the token is.
    pub kind: TokenKind,
    /// HTML attributes assigned by passes, in insertion order.
    pub attrs: Vec<(String, String)>,
    /// Plain text for inline tokens, raw text for code and HTML blocks.
    pub content: String,
    /// Inline mdast children for [`TokenKind::Inline`].
    pub children: Vec<Node>,
    /// Source text of an inline run as written, escapes included. Empty
    /// when the tree carries no positions.
    pub markup: String,
    /// Hidden tokens emit no markup (paragraphs inside tight lists).
    pub hidden: bool,
    /// Container nesting depth.
    pub level: usize,
}

impl Token {
    /// Creates a token with no attributes or content.
    pub fn new(kind: TokenKind, level: usize) -> Self {
        Self {
            kind,
            attrs: Vec::new(),
            content: String::new(),
            children: Vec::new(),
            markup: String::new(),
            hidden: false,
            level,
        }
    }

    /// Looks up an attribute value.
    pub fn attr_get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn attr_set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// True for tokens that open a container.
    pub fn is_open(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::ParagraphOpen
                | TokenKind::HeadingOpen(_)
                | TokenKind::BlockquoteOpen
                | TokenKind::CalloutOpen(_)
                | TokenKind::ListOpen { .. }
                | TokenKind::ListItemOpen { .. }
                | TokenKind::TaskLabelOpen { .. }
                | TokenKind::FootnoteBlockOpen
                | TokenKind::FootnoteOpen { .. }
        )
    }

    /// True for tokens that close a container.
    pub fn is_close(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::ParagraphClose
                | TokenKind::HeadingClose(_)
                | TokenKind::BlockquoteClose
                | TokenKind::CalloutClose
                | TokenKind::ListClose { .. }
                | TokenKind::ListItemClose
                | TokenKind::TaskLabelClose
                | TokenKind::FootnoteBlockClose
                | TokenKind::FootnoteClose
        )
    }
}

/// Target of a `[label]: url "title"` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDefinition {
    /// Destination URL.
    pub url: String,
    /// Optional title.
    pub title: Option<String>,
}

/// Footnote numbering, fixed by order of first reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FootnoteIndex {
    ordinals: HashMap<String, usize>,
    ref_counts: Vec<usize>,
}

impl FootnoteIndex {
    fn record_reference(&mut self, identifier: &str) {
        match self.ordinals.get(identifier) {
            Some(&ordinal) => self.ref_counts[ordinal - 1] += 1,
            None => {
                self.ref_counts.push(1);
                self.ordinals
                    .insert(identifier.to_string(), self.ref_counts.len());
            }
        }
    }

    /// 1-based number of a referenced footnote.
    pub fn ordinal(&self, identifier: &str) -> Option<usize> {
        self.ordinals.get(identifier).copied()
    }

    /// Total references to the footnote with the given number.
    pub fn ref_count(&self, ordinal: usize) -> usize {
        ordinal
            .checked_sub(1)
            .and_then(|index| self.ref_counts.get(index))
            .copied()
            .unwrap_or(0)
    }

    /// Number of referenced footnotes.
    pub fn len(&self) -> usize {
        self.ref_counts.len()
    }

    /// True when nothing references a footnote.
    pub fn is_empty(&self) -> bool {
        self.ref_counts.is_empty()
    }
}

/// Output of [`crate::MarkdownEngine::parse_tokens`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    /// Block tokens after all passes ran.
    pub tokens: Vec<Token>,
    /// Link reference definitions keyed by normalised identifier.
    pub definitions: HashMap<String, LinkDefinition>,
    /// Footnote numbering.
    pub footnotes: FootnoteIndex,
}

/// Flattens a parsed mdast root into a token stream.
///
/// `source` is the text the tree was parsed from; it distinguishes fenced
/// code from indented code.
pub fn tokenize(root: &Node, source: &str) -> ParsedDocument {
    let mut flattener = Flattener {
        source,
        tokens: Vec::new(),
        level: 0,
        definitions: HashMap::new(),
        footnote_bodies: HashMap::new(),
        footnotes: FootnoteIndex::default(),
    };
    flattener.collect(root);
    flattener.block(root, false);
    flattener.footnote_tail();

    ParsedDocument {
        tokens: flattener.tokens,
        definitions: flattener.definitions,
        footnotes: flattener.footnotes,
    }
}

/// Collects the plain text of phrasing nodes (markup removed).
pub fn plain_text(nodes: &[Node]) -> String {
    let mut text = String::new();
    for node in nodes {
        push_plain_text(node, &mut text);
    }
    text.trim().to_string()
}

fn push_plain_text(node: &Node, buffer: &mut String) {
    match node {
        Node::Text(t) => buffer.push_str(&t.value),
        Node::InlineCode(code) => buffer.push_str(&code.value),
        Node::Break(_) => buffer.push('\n'),
        Node::Strong(_)
        | Node::Emphasis(_)
        | Node::Delete(_)
        | Node::Link(_)
        | Node::LinkReference(_) => {
            for child in node.children().into_iter().flatten() {
                push_plain_text(child, buffer);
            }
        }
        // Images, raw HTML and footnote calls carry no heading text
        _ => {}
    }
}

struct Flattener<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    level: usize,
    definitions: HashMap<String, LinkDefinition>,
    footnote_bodies: HashMap<String, Vec<Node>>,
    footnotes: FootnoteIndex,
}

impl Flattener<'_> {
    /// Gathers definitions and footnote numbering in document order.
    fn collect(&mut self, node: &Node) {
        match node {
            Node::Definition(def) => {
                self.definitions
                    .entry(def.identifier.clone())
                    .or_insert_with(|| LinkDefinition {
                        url: def.url.clone(),
                        title: def.title.clone(),
                    });
            }
            Node::FootnoteDefinition(def) => {
                self.footnote_bodies
                    .entry(def.identifier.clone())
                    .or_insert_with(|| def.children.clone());
            }
            Node::FootnoteReference(reference) => {
                self.footnotes.record_reference(&reference.identifier);
            }
            _ => {}
        }

        for child in node.children().into_iter().flatten() {
            self.collect(child);
        }
    }

    fn push(&mut self, kind: TokenKind) -> &mut Token {
        let mut token = Token::new(kind, self.level);
        if token.is_close() {
            self.level = self.level.saturating_sub(1);
            token.level = self.level;
        } else if token.is_open() {
            self.level += 1;
        }
        let index = self.tokens.len();
        self.tokens.push(token);
        &mut self.tokens[index]
    }

    fn inline(&mut self, children: &[Node]) {
        let markup = self.markup(children).to_string();
        let token = self.push(TokenKind::Inline);
        token.content = plain_text(children);
        token.children = children.to_vec();
        token.markup = markup;
    }

    fn paragraph(&mut self, children: &[Node], tight: bool, task: Option<bool>) {
        self.push(TokenKind::ParagraphOpen).hidden = tight;
        if let Some(checked) = task {
            self.push(TokenKind::TaskLabelOpen { checked });
            self.inline(children);
            self.push(TokenKind::TaskLabelClose);
        } else {
            self.inline(children);
        }
        self.push(TokenKind::ParagraphClose).hidden = tight;
    }

    fn block(&mut self, node: &Node, tight: bool) {
        match node {
            Node::Root(root) => self.blocks(&root.children, false),
            Node::Paragraph(para) => self.paragraph(&para.children, tight, None),
            Node::Heading(heading) => {
                self.push(TokenKind::HeadingOpen(heading.depth));
                self.inline(&heading.children);
                self.push(TokenKind::HeadingClose(heading.depth));
            }
            Node::Blockquote(quote) => {
                self.push(TokenKind::BlockquoteOpen);
                self.blocks(&quote.children, false);
                self.push(TokenKind::BlockquoteClose);
            }
            Node::List(list) => {
                let tasks = list
                    .children
                    .iter()
                    .any(|item| matches!(item, Node::ListItem(li) if li.checked.is_some()));
                self.push(TokenKind::ListOpen {
                    ordered: list.ordered,
                    start: list.start,
                    tasks,
                });
                let loose = list.spread
                    || list
                        .children
                        .iter()
                        .any(|item| matches!(item, Node::ListItem(li) if li.spread));
                for item in &list.children {
                    self.block(item, !loose);
                }
                self.push(TokenKind::ListClose {
                    ordered: list.ordered,
                });
            }
            Node::ListItem(item) => {
                self.push(TokenKind::ListItemOpen {
                    checked: item.checked,
                });
                for (index, child) in item.children.iter().enumerate() {
                    match (index, item.checked, child) {
                        (0, Some(checked), Node::Paragraph(para)) => {
                            self.paragraph(&para.children, tight, Some(checked));
                        }
                        _ => self.block(child, tight),
                    }
                }
                self.push(TokenKind::ListItemClose);
            }
            Node::Code(code) => {
                let content = if code.value.is_empty() {
                    String::new()
                } else {
                    format!("{}\n", code.value)
                };
                let kind = if self.is_fenced(code) {
                    TokenKind::Fence {
                        lang: code.lang.clone(),
                    }
                } else {
                    TokenKind::CodeBlock
                };
                self.push(kind).content = content;
            }
            Node::Html(html) => {
                self.push(TokenKind::HtmlBlock).content = html.value.clone();
            }
            Node::ThematicBreak(_) => {
                self.push(TokenKind::Hr);
            }
            Node::Table(table) => {
                self.push(TokenKind::Table(table.clone()));
            }
            // Collected up front; footnote bodies are emitted in the tail.
            Node::Definition(_) | Node::FootnoteDefinition(_) => {}
            Node::Yaml(_) | Node::Toml(_) => {
                log::trace!("Skipping frontmatter node left in the tree");
            }
            other => {
                log::warn!("Unhandled block node: {:?}", other);
            }
        }
    }

    fn blocks(&mut self, nodes: &[Node], tight: bool) {
        for node in nodes {
            self.block(node, tight);
        }
    }

    fn markup(&self, children: &[Node]) -> &str {
        let start = children.first().and_then(Node::position);
        let end = children.last().and_then(Node::position);
        match (start, end) {
            (Some(start), Some(end)) => self
                .source
                .get(start.start.offset..end.end.offset)
                .unwrap_or_default(),
            _ => "",
        }
    }

    fn is_fenced(&self, code: &markdown::mdast::Code) -> bool {
        let Some(position) = &code.position else {
            return code.lang.is_some() || code.meta.is_some();
        };
        self.source
            .get(position.start.offset..)
            .map(|rest| {
                let rest = rest.trim_start_matches([' ', '\t']);
                rest.starts_with("```") || rest.starts_with("~~~")
            })
            .unwrap_or(false)
    }

    fn footnote_tail(&mut self) {
        if self.footnotes.is_empty() {
            return;
        }

        let mut ordered: Vec<(usize, String)> = self
            .footnotes
            .ordinals
            .iter()
            .map(|(identifier, &ordinal)| (ordinal, identifier.clone()))
            .collect();
        ordered.sort();

        self.push(TokenKind::FootnoteBlockOpen);
        for (ordinal, identifier) in ordered {
            let refs = self.footnotes.ref_count(ordinal);
            let body = self.footnote_bodies.remove(&identifier).unwrap_or_default();

            self.push(TokenKind::FootnoteOpen { ordinal });
            self.blocks(&body, false);
            let anchor = Token::new(TokenKind::FootnoteAnchor { ordinal, refs }, self.level + 1);
            match self.tokens.last() {
                Some(last) if last.kind == TokenKind::ParagraphClose => {
                    let at = self.tokens.len() - 1;
                    self.tokens.insert(at, anchor);
                }
                _ => self.tokens.push(anchor),
            }
            self.push(TokenKind::FootnoteClose);
        }
        self.push(TokenKind::FootnoteBlockClose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docblog_core::{ParseOptions, parse_mdast};

    fn tokens(input: &str) -> ParsedDocument {
        let root = parse_mdast(input, &ParseOptions::default()).unwrap();
        tokenize(&root, input)
    }

    fn kinds(doc: &ParsedDocument) -> Vec<TokenKind> {
        doc.tokens.iter().map(|t| t.kind.clone()).collect()
    }

    #[test]
    fn inline_markup_keeps_escapes() {
        let doc = tokens("\\[!NOTE] *hi*\n");
        let inline = doc.tokens.iter().find(|t| t.kind == TokenKind::Inline).unwrap();
        assert_eq!(inline.markup, "\\[!NOTE] *hi*");
        assert_eq!(inline.content, "[!NOTE] hi");
    }

    #[test]
    fn paragraph_triple() {
        let doc = tokens("Hello *world*\n");
        assert_eq!(
            kinds(&doc),
            vec![
                TokenKind::ParagraphOpen,
                TokenKind::Inline,
                TokenKind::ParagraphClose
            ]
        );
        assert_eq!(doc.tokens[1].content, "Hello world");
        assert_eq!(doc.tokens[1].level, 1);
    }

    #[test]
    fn blockquote_wraps_blocks() {
        let doc = tokens("> one\n>\n> two\n");
        let kinds = kinds(&doc);
        assert_eq!(kinds.first(), Some(&TokenKind::BlockquoteOpen));
        assert_eq!(kinds.last(), Some(&TokenKind::BlockquoteClose));
        assert_eq!(
            kinds
                .iter()
                .filter(|k| **k == TokenKind::ParagraphOpen)
                .count(),
            2
        );
    }

    #[test]
    fn tight_list_paragraphs_are_hidden() {
        let doc = tokens("- a\n- b\n");
        let paragraphs: Vec<&Token> = doc
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::ParagraphOpen)
            .collect();
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs.iter().all(|t| t.hidden));
    }

    #[test]
    fn loose_list_paragraphs_are_visible() {
        let doc = tokens("- a\n\n- b\n");
        assert!(
            doc.tokens
                .iter()
                .filter(|t| t.kind == TokenKind::ParagraphOpen)
                .all(|t| !t.hidden)
        );
    }

    #[test]
    fn task_items_get_label_tokens() {
        let doc = tokens("- [x] done\n- [ ] todo\n");
        assert!(matches!(
            doc.tokens[0].kind,
            TokenKind::ListOpen { tasks: true, .. }
        ));
        assert!(
            doc.tokens
                .iter()
                .any(|t| t.kind == TokenKind::TaskLabelOpen { checked: true })
        );
        assert!(
            doc.tokens
                .iter()
                .any(|t| t.kind == TokenKind::TaskLabelOpen { checked: false })
        );
    }

    #[test]
    fn fenced_and_indented_code_are_distinguished() {
        let doc = tokens("```rust\nfn main() {}\n```\n\n    indented\n");
        assert_eq!(
            doc.tokens[0].kind,
            TokenKind::Fence {
                lang: Some("rust".into())
            }
        );
        assert_eq!(doc.tokens[0].content, "fn main() {}\n");
        assert_eq!(doc.tokens[1].kind, TokenKind::CodeBlock);
        assert_eq!(doc.tokens[1].content, "indented\n");
    }

    #[test]
    fn fence_without_language_is_still_a_fence() {
        let doc = tokens("~~~\nplain\n~~~\n");
        assert_eq!(doc.tokens[0].kind, TokenKind::Fence { lang: None });
    }

    #[test]
    fn definitions_are_collected() {
        let doc = tokens("[Docs][d]\n\n[d]: https://example.com \"Example\"\n");
        let def = doc.definitions.get("d").unwrap();
        assert_eq!(def.url, "https://example.com");
        assert_eq!(def.title.as_deref(), Some("Example"));
        assert_eq!(
            kinds(&doc),
            vec![
                TokenKind::ParagraphOpen,
                TokenKind::Inline,
                TokenKind::ParagraphClose
            ]
        );
    }

    #[test]
    fn footnotes_are_numbered_by_first_reference() {
        let doc = tokens("A[^b] B[^a] C[^b]\n\n[^a]: First def.\n[^b]: Second def.\n");
        assert_eq!(doc.footnotes.ordinal("b"), Some(1));
        assert_eq!(doc.footnotes.ordinal("a"), Some(2));
        assert_eq!(doc.footnotes.ref_count(1), 2);
        assert_eq!(doc.footnotes.ref_count(2), 1);

        let tail: Vec<TokenKind> = kinds(&doc)
            .into_iter()
            .skip_while(|k| *k != TokenKind::FootnoteBlockOpen)
            .collect();
        assert_eq!(
            tail,
            vec![
                TokenKind::FootnoteBlockOpen,
                TokenKind::FootnoteOpen { ordinal: 1 },
                TokenKind::ParagraphOpen,
                TokenKind::Inline,
                TokenKind::FootnoteAnchor {
                    ordinal: 1,
                    refs: 2
                },
                TokenKind::ParagraphClose,
                TokenKind::FootnoteClose,
                TokenKind::FootnoteOpen { ordinal: 2 },
                TokenKind::ParagraphOpen,
                TokenKind::Inline,
                TokenKind::FootnoteAnchor {
                    ordinal: 2,
                    refs: 1
                },
                TokenKind::ParagraphClose,
                TokenKind::FootnoteClose,
                TokenKind::FootnoteBlockClose,
            ]
        );
    }

    #[test]
    fn levels_balance() {
        let doc = tokens("> - a\n>   - b\n\n# Title\n");
        assert_eq!(doc.tokens.first().map(|t| t.level), Some(0));
        assert_eq!(doc.tokens.last().map(|t| t.level), Some(0));
    }

    #[test]
    fn callout_kind_tables() {
        assert_eq!(CalloutKind::from_marker("TIP"), Some(CalloutKind::Tip));
        assert_eq!(CalloutKind::from_marker("tip"), None);
        assert_eq!(CalloutKind::Caution.icon(), "error_outline");
        assert_eq!(CalloutKind::Important.as_str(), "important");
    }

    #[test]
    fn plain_text_strips_markup() {
        let root = parse_mdast("Use **`cargo`** [now](x)!\n", &ParseOptions::default()).unwrap();
        let doc = tokenize(&root, "Use **`cargo`** [now](x)!\n");
        assert_eq!(doc.tokens[1].content, "Use cargo now!");
    }
}
