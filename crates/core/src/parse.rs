//! Markdown parsing adapter over markdown-rs.

use crate::MarkflowError;
use markdown::mdast::Node;
use markdown::message::{Message, Place};

/// Parser options for building markdown-rs parse options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Enable GitHub Flavored Markdown constructs (tables, strikethrough,
    /// autolink literals, task lists, footnotes).
    pub gfm: bool,
    /// Let markdown-rs consume a YAML frontmatter block itself.
    pub frontmatter: bool,
    /// Enable indented code blocks.
    pub code_indented: bool,
    /// Allow raw HTML nodes in the AST.
    pub raw_html: bool,
    /// Recognise bare URLs as links.
    pub autolink_literals: bool,
    /// Enable math constructs ($inline$ and $$block$$).
    pub math: bool,
}

impl ParseOptions {
    /// Documentation defaults: GFM and raw HTML on, frontmatter handled by
    /// [`crate::frontmatter::parse_frontmatter`] before parsing.
    pub const fn markdown() -> Self {
        Self {
            gfm: true,
            frontmatter: false,
            code_indented: true,
            raw_html: true,
            autolink_literals: true,
            math: false,
        }
    }

    /// Convert to markdown-rs `ParseOptions`.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            frontmatter: self.frontmatter,
            code_indented: self.code_indented,
            html_flow: self.raw_html,
            html_text: self.raw_html,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = self.autolink_literals;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        if self.math {
            constructs.math_flow = true;
            constructs.math_text = true;
        }

        markdown::ParseOptions {
            constructs,
            math_text_single_dollar: self.math,
            ..markdown::ParseOptions::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::markdown()
    }
}

/// Parse markdown into an MDAST tree using core options.
pub fn parse_mdast(input: &str, options: &ParseOptions) -> Result<Node, MarkflowError> {
    parse_mdast_with_options(input, &options.to_markdown())
}

/// Parse markdown into an MDAST tree using markdown-rs `ParseOptions`.
pub fn parse_mdast_with_options(
    input: &str,
    options: &markdown::ParseOptions,
) -> Result<Node, MarkflowError> {
    markdown::to_mdast(input, options).map_err(|err| {
        let (line, column) = message_point(&err);
        MarkflowError::parse_error(err.to_string(), line, column)
    })
}

/// Line and column a parser message points at; `1:1` when it has no place.
fn message_point(message: &Message) -> (usize, usize) {
    match message.place.as_deref() {
        Some(Place::Point(point)) => (point.line, point.column),
        Some(Place::Position(position)) => (position.start.line, position.start.column),
        None => (1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: ParseOptions = ParseOptions {
        gfm: false,
        raw_html: false,
        ..ParseOptions::markdown()
    };

    fn first_child(root: &Node) -> Option<&Node> {
        root.children().and_then(|children| children.first())
    }

    #[test]
    fn gfm_tables_parse_by_default() {
        let root = parse_mdast("| a |\n| - |\n| b |\n", &ParseOptions::default()).unwrap();
        assert!(matches!(first_child(&root), Some(Node::Table(_))));
    }

    #[test]
    fn tables_need_gfm() {
        let root = parse_mdast("| a |\n| - |\n| b |\n", &PLAIN).unwrap();
        assert!(matches!(first_child(&root), Some(Node::Paragraph(_))));
    }

    #[test]
    fn frontmatter_is_not_consumed_by_default() {
        let root = parse_mdast("---\ntitle: x\n---\n", &ParseOptions::default()).unwrap();
        assert!(matches!(first_child(&root), Some(Node::ThematicBreak(_))));
    }

    #[test]
    fn raw_html_toggle() {
        let with_html = parse_mdast("<div>hi</div>\n", &ParseOptions::default()).unwrap();
        assert!(matches!(first_child(&with_html), Some(Node::Html(_))));

        let without = parse_mdast("<div>hi</div>\n", &PLAIN).unwrap();
        assert!(matches!(first_child(&without), Some(Node::Paragraph(_))));
    }
}
