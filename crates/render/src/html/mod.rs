//! HTML serialization of the block token stream.
//!
//! Output carries no whitespace between block tags; newlines appear only
//! inside text, code and raw HTML.

mod context;
mod inline;

pub use context::Context;
pub use inline::is_safe_url;

use crate::code_block::CodeBlockFormatter;
use crate::highlight::escape_code;
use crate::options::RenderOptions;
use crate::token::{ParsedDocument, Token, TokenKind};
use inline::{render_inline, render_node};
use markdown::mdast::{AlignKind, Node, Table};

/// Serializes a parsed document.
pub fn render_document(
    doc: &ParsedDocument,
    options: &RenderOptions,
    formatter: CodeBlockFormatter<'_>,
) -> String {
    let mut ctx = Context::new(options, &doc.definitions, &doc.footnotes, formatter);
    for token in &doc.tokens {
        render_token(token, &mut ctx);
    }
    ctx.finish()
}

fn render_token(token: &Token, ctx: &mut Context) {
    match &token.kind {
        TokenKind::ParagraphOpen if !token.hidden => ctx.push_raw("<p>"),
        TokenKind::ParagraphClose if !token.hidden => ctx.push_raw("</p>"),
        TokenKind::ParagraphOpen | TokenKind::ParagraphClose => {}
        TokenKind::HeadingOpen(depth) => render_heading_open(*depth, token, ctx),
        TokenKind::HeadingClose(depth) => ctx.push_raw(&format!("</h{depth}>")),
        TokenKind::BlockquoteOpen => ctx.push_raw("<blockquote>"),
        TokenKind::BlockquoteClose => ctx.push_raw("</blockquote>"),
        TokenKind::CalloutOpen(kind) => ctx.push_raw(&format!(
            r#"<div class="callout callout-{}"><div class="callout-icon-wrapper"><span class="material-icons-round">{}</span></div><div class="callout-content-wrapper">"#,
            kind.as_str(),
            kind.icon()
        )),
        TokenKind::CalloutClose => ctx.push_raw("</div></div>"),
        TokenKind::ListOpen {
            ordered,
            start,
            tasks,
        } => {
            let tag = if *ordered { "ol" } else { "ul" };
            ctx.push_raw("<");
            ctx.push_raw(tag);
            if let Some(start) = start.filter(|s| *ordered && *s != 1) {
                ctx.push_attr("start", &start.to_string());
            }
            if *tasks {
                ctx.push_attr("class", "contains-task-list");
            }
            ctx.push_raw(">");
        }
        TokenKind::ListClose { ordered } => {
            ctx.push_raw(if *ordered { "</ol>" } else { "</ul>" });
        }
        TokenKind::ListItemOpen { checked: Some(_) } => {
            ctx.push_raw(r#"<li class="task-list-item enabled">"#);
        }
        TokenKind::ListItemOpen { checked: None } => ctx.push_raw("<li>"),
        TokenKind::ListItemClose => ctx.push_raw("</li>"),
        TokenKind::TaskLabelOpen { checked } => {
            ctx.push_raw(r#"<label><input class="task-list-item-checkbox" type="checkbox""#);
            if *checked {
                ctx.push_raw(r#" checked="""#);
            }
            ctx.push_raw("> ");
        }
        TokenKind::TaskLabelClose => ctx.push_raw("</label>"),
        TokenKind::Inline => render_inline(&token.children, ctx),
        TokenKind::Fence { lang } => {
            let block = ctx.formatter().format(&token.content, lang.as_deref());
            ctx.push_raw(&block.html);
        }
        TokenKind::CodeBlock => {
            ctx.push_raw("<pre><code>");
            ctx.push_raw(&escape_code(&token.content));
            ctx.push_raw("</code></pre>");
        }
        TokenKind::HtmlBlock => {
            if ctx.options().allow_html {
                ctx.push_raw(&token.content);
            } else {
                log::debug!("Escaping HTML block: {}", token.content);
                ctx.push_text(&token.content);
            }
        }
        TokenKind::Hr => ctx.push_raw("<hr>"),
        TokenKind::Table(table) => render_table(table, ctx),
        TokenKind::FootnoteBlockOpen => ctx.push_raw(
            r#"<hr class="footnotes-sep"><section class="footnotes"><ol class="footnotes-list">"#,
        ),
        TokenKind::FootnoteBlockClose => ctx.push_raw("</ol></section>"),
        TokenKind::FootnoteOpen { ordinal } => {
            ctx.push_raw(&format!(r#"<li id="fn{ordinal}" class="footnote-item">"#));
        }
        TokenKind::FootnoteClose => ctx.push_raw("</li>"),
        TokenKind::FootnoteAnchor { ordinal, refs } => {
            for sub in 0..(*refs).max(1) {
                let target = if sub == 0 {
                    format!("fnref{ordinal}")
                } else {
                    format!("fnref{ordinal}:{sub}")
                };
                ctx.push_raw(&format!(
                    " <a href=\"#{target}\" class=\"footnote-backref\">\u{21a9}\u{fe0e}</a>"
                ));
            }
        }
    }
}

/// `<hN id=".." tabindex="-1">` plus the permalink when the heading has an id.
fn render_heading_open(depth: u8, token: &Token, ctx: &mut Context) {
    ctx.push_raw(&format!("<h{depth}"));
    for (name, value) in &token.attrs {
        ctx.push_attr(name, value);
    }
    ctx.push_raw(">");

    if ctx.options().heading_permalinks
        && let Some(id) = token.attr_get("id")
    {
        ctx.push_raw(r#"<a class="header-anchor""#);
        ctx.push_attr("href", &format!("#{id}"));
        ctx.push_raw(r#" aria-hidden="true">#</a> "#);
    }
}

fn render_table(table: &Table, ctx: &mut Context) {
    ctx.push_raw("<table><thead>");
    if let Some(Node::TableRow(row)) = table.children.first() {
        render_table_row(row, ctx, true, &table.align);
    }
    ctx.push_raw("</thead>");

    if table.children.len() > 1 {
        ctx.push_raw("<tbody>");
        for row in table.children.iter().skip(1) {
            if let Node::TableRow(r) = row {
                render_table_row(r, ctx, false, &table.align);
            }
        }
        ctx.push_raw("</tbody>");
    }
    ctx.push_raw("</table>");
}

fn render_table_row(
    row: &markdown::mdast::TableRow,
    ctx: &mut Context,
    is_header: bool,
    aligns: &[AlignKind],
) {
    let tag = if is_header { "th" } else { "td" };
    ctx.push_raw("<tr>");
    for (i, cell) in row.children.iter().enumerate() {
        let Node::TableCell(cell) = cell else {
            continue;
        };
        let align = match aligns.get(i) {
            Some(AlignKind::Left) => r#" style="text-align:left""#,
            Some(AlignKind::Right) => r#" style="text-align:right""#,
            Some(AlignKind::Center) => r#" style="text-align:center""#,
            Some(AlignKind::None) | None => "",
        };
        ctx.push_raw(&format!("<{tag}{align}>"));
        ctx.start_inline();
        for child in &cell.children {
            render_node(child, ctx);
        }
        ctx.push_raw(&format!("</{tag}>"));
    }
    ctx.push_raw("</tr>");
}
