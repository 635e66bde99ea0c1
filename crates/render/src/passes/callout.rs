use super::TokenTransform;
use crate::token::{CalloutKind, Token, TokenKind, plain_text};
use markdown::mdast::Node;
use once_cell::sync::Lazy;
use regex::Regex;

static CALLOUT_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[!(NOTE|WARNING|TIP|DANGER|IMPORTANT|CAUTION)\]\s*\n?")
        .expect("callout pattern is valid")
});

/// Turns `> [!TYPE]` blockquotes into callout containers.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalloutPass;

impl TokenTransform for CalloutPass {
    fn name(&self) -> &'static str {
        "callout"
    }

    fn apply(&self, mut tokens: Vec<Token>) -> Vec<Token> {
        for open in 0..tokens.len() {
            if tokens[open].kind != TokenKind::BlockquoteOpen {
                continue;
            }

            let Some(inline) = first_inline(&tokens, open) else {
                continue;
            };
            if !written_with_marker(&tokens[inline]) {
                continue;
            }
            let Some((kind, marker_len)) = match_marker(&tokens[inline].children) else {
                continue;
            };

            let token = &mut tokens[inline];
            strip_leading(&mut token.children, marker_len);
            token.content = plain_text(&token.children);
            if token.children.is_empty() {
                hide_paragraph(&mut tokens, inline);
            }

            let level = tokens[open].level;
            tokens[open].kind = TokenKind::CalloutOpen(kind);
            if let Some(close) = tokens
                .iter()
                .skip(open + 1)
                .position(|t| t.kind == TokenKind::BlockquoteClose && t.level == level)
                .map(|offset| open + 1 + offset)
            {
                tokens[close].kind = TokenKind::CalloutClose;
            }
            log::trace!("Blockquote at token {} became a {} callout", open, kind.as_str());
        }
        tokens
    }
}

/// First inline token after `open`, stopping at any blockquote close.
fn first_inline(tokens: &[Token], open: usize) -> Option<usize> {
    for (index, token) in tokens.iter().enumerate().skip(open + 1) {
        match token.kind {
            TokenKind::Inline => return Some(index),
            TokenKind::BlockquoteClose => return None,
            _ => {}
        }
    }
    None
}

/// The marker must appear literally in the source; `\[!NOTE]` is escaped text.
fn written_with_marker(inline: &Token) -> bool {
    inline.markup.is_empty() || CALLOUT_MARKER.is_match(&inline.markup)
}

/// Leading literal text of an inline run; breaks count as newlines.
fn leading_text(children: &[Node]) -> String {
    let mut text = String::new();
    for child in children {
        match child {
            Node::Text(t) => text.push_str(&t.value),
            Node::Break(_) => text.push('\n'),
            _ => break,
        }
    }
    text
}

fn match_marker(children: &[Node]) -> Option<(CalloutKind, usize)> {
    let text = leading_text(children);
    let captures = CALLOUT_MARKER.captures(&text)?;
    let kind = CalloutKind::from_marker(captures.get(1)?.as_str())?;
    Some((kind, captures.get(0)?.end()))
}

/// Removes `len` bytes of leading text, dropping nodes that become empty.
fn strip_leading(children: &mut Vec<Node>, mut len: usize) {
    while len > 0 {
        let Some(first) = children.first_mut() else {
            return;
        };
        match first {
            Node::Text(t) if t.value.len() <= len => {
                len -= t.value.len();
                children.remove(0);
            }
            Node::Text(t) => {
                t.value = t.value.split_off(len);
                len = 0;
            }
            Node::Break(_) => {
                len -= 1;
                children.remove(0);
            }
            _ => return,
        }
    }
}

fn hide_paragraph(tokens: &mut [Token], inline: usize) {
    if let Some(open) = inline.checked_sub(1)
        && tokens[open].kind == TokenKind::ParagraphOpen
    {
        tokens[open].hidden = true;
    }
    if let Some(close) = tokens.get_mut(inline + 1)
        && close.kind == TokenKind::ParagraphClose
    {
        close.hidden = true;
    }
}
