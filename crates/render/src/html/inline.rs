//! Phrasing content rendering.

use super::context::Context;
use markdown::mdast::Node;

/// Renders the children of an inline token.
pub fn render_inline(nodes: &[Node], ctx: &mut Context) {
    ctx.start_inline();
    for node in nodes {
        render_node(node, ctx);
    }
}

/// Recursively renders a phrasing node.
pub fn render_node(node: &Node, ctx: &mut Context) {
    match node {
        Node::Text(text) => ctx.push_prose(&text.value),
        Node::Strong(strong) => wrap("strong", &strong.children, ctx),
        Node::Emphasis(emphasis) => wrap("em", &emphasis.children, ctx),
        Node::Delete(delete) => wrap("s", &delete.children, ctx),
        Node::InlineCode(code) => {
            ctx.push_raw("<code>");
            ctx.push_text(&code.value);
            ctx.push_raw("</code>");
        }
        Node::Break(_) => ctx.push_raw("<br>"),
        Node::Link(link) => render_link(&link.url, link.title.as_deref(), &link.children, ctx),
        Node::LinkReference(reference) => match ctx.definition(&reference.identifier) {
            Some(def) => render_link(&def.url, def.title.as_deref(), &reference.children, ctx),
            None => {
                for child in &reference.children {
                    render_node(child, ctx);
                }
            }
        },
        Node::Image(img) => render_image(&img.url, &img.alt, img.title.as_deref(), ctx),
        Node::ImageReference(reference) => match ctx.definition(&reference.identifier) {
            Some(def) => render_image(&def.url, &reference.alt, def.title.as_deref(), ctx),
            None => ctx.push_text(&reference.alt),
        },
        Node::Html(html) => {
            if ctx.options().allow_html {
                ctx.push_raw(&html.value);
            } else {
                log::debug!("Escaping inline HTML: {}", html.value);
                ctx.push_text(&html.value);
            }
        }
        Node::FootnoteReference(reference) => render_footnote_reference(&reference.identifier, ctx),
        _ => {
            log::warn!("Unhandled inline node: {:?}", node);
        }
    }
}

fn wrap(tag: &str, children: &[Node], ctx: &mut Context) {
    ctx.push_raw(&format!("<{tag}>"));
    for child in children {
        render_node(child, ctx);
    }
    ctx.push_raw(&format!("</{tag}>"));
}

/// Schemes that never become `href`/`src` values.
const BAD_SCHEMES: [&str; 4] = ["javascript:", "vbscript:", "file:", "data:"];
const SAFE_DATA_IMAGES: [&str; 4] = [
    "data:image/gif;",
    "data:image/png;",
    "data:image/jpeg;",
    "data:image/webp;",
];

/// False for script-capable or local-file URLs.
pub fn is_safe_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    if SAFE_DATA_IMAGES.iter().any(|prefix| lower.starts_with(prefix)) {
        return true;
    }
    !BAD_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

/// Renders `<a>`; unsafe destinations render as their text only.
fn render_link(url: &str, title: Option<&str>, children: &[Node], ctx: &mut Context) {
    if !is_safe_url(url) {
        log::debug!("Dropping link with unsafe destination: {}", url);
        for child in children {
            render_node(child, ctx);
        }
        return;
    }

    ctx.push_raw("<a");
    ctx.push_attr("href", url);
    if let Some(title) = title {
        ctx.push_attr("title", title);
    }
    ctx.push_raw(">");
    for child in children {
        render_node(child, ctx);
    }
    ctx.push_raw("</a>");
}

fn render_image(url: &str, alt: &str, title: Option<&str>, ctx: &mut Context) {
    let src = if is_safe_url(url) { url } else { "" };
    ctx.push_raw("<img");
    ctx.push_attr("src", src);
    ctx.push_attr("alt", alt);
    if let Some(title) = title {
        ctx.push_attr("title", title);
    }
    ctx.push_raw(">");
}

/// `<sup class="footnote-ref"><a href="#fnN" id="fnrefN">[N]</a></sup>`; repeat
/// call sites get `fnrefN:K` ids and `[N:K]` captions.
fn render_footnote_reference(identifier: &str, ctx: &mut Context) {
    let Some(ordinal) = ctx.footnote_ordinal(identifier) else {
        log::warn!("Footnote reference `{}` has no number", identifier);
        return;
    };
    let sub = ctx.next_footnote_ref(ordinal);
    let (ref_id, caption) = if sub == 0 {
        (format!("fnref{ordinal}"), ordinal.to_string())
    } else {
        (format!("fnref{ordinal}:{sub}"), format!("{ordinal}:{sub}"))
    };

    ctx.push_raw(&format!(
        r##"<sup class="footnote-ref"><a href="#fn{ordinal}" id="{ref_id}">[{caption}]</a></sup>"##
    ));
}

#[cfg(test)]
mod tests {
    use super::is_safe_url;

    #[test]
    fn url_safety() {
        assert!(is_safe_url("https://example.com"));
        assert!(is_safe_url("/guide/intro"));
        assert!(is_safe_url("#section"));
        assert!(is_safe_url("data:image/png;base64,AAAA"));
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url("  JavaScript:alert(1)"));
        assert!(!is_safe_url("vbscript:x"));
        assert!(!is_safe_url("file:///etc/passwd"));
        assert!(!is_safe_url("data:text/html;base64,AAAA"));
    }
}
