//! Table-of-contents extraction from the token stream.

use crate::token::{Token, TokenKind};
use serde::Serialize;

/// One outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level, 2 or 3.
    pub level: u8,
    /// Heading text with inline markup removed.
    pub text: String,
    /// Anchor id assigned to the heading.
    pub slug: String,
}

/// Collects level 2 and 3 headings in document order.
///
/// Ids are read from the heading tokens, never recomputed, so every entry
/// links to an anchor present in the rendered HTML. Headings without an id
/// are left out.
pub fn extract_toc(tokens: &[Token]) -> Vec<TocEntry> {
    tokens
        .iter()
        .enumerate()
        .filter_map(|(index, token)| {
            let TokenKind::HeadingOpen(level) = token.kind else {
                return None;
            };
            if !(2..=3).contains(&level) {
                return None;
            }
            let slug = token.attr_get("id").filter(|id| !id.is_empty())?;
            let text = tokens
                .get(index + 1)
                .filter(|next| next.kind == TokenKind::Inline)
                .map(|inline| inline.content.clone())
                .unwrap_or_default();
            Some(TocEntry {
                level,
                text,
                slug: slug.to_string(),
            })
        })
        .collect()
}
