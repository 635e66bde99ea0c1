use super::TokenTransform;
use crate::token::{Token, TokenKind};
use crate::typography::apply_typography;
use docblog_core::{Slugger, slugify};
use std::borrow::Cow;

/// Assigns `id` and `tabindex="-1"` to every heading from its plain text.
///
/// Headings whose text has no sluggable characters get no id. Repeated
/// headings share an id unless deduplication is switched on, in which case
/// later ones get `-1`, `-2`, ... suffixes.
///
/// With the typographer on, the slug is taken from the text as it will be
/// displayed, so `A--B` (shown as `A–B`) becomes `ab`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadingAnchorPass {
    dedupe: bool,
    typographer: bool,
}

impl HeadingAnchorPass {
    /// Creates the pass.
    pub fn new(dedupe: bool) -> Self {
        Self {
            dedupe,
            typographer: false,
        }
    }

    /// Slugs the typographer's output instead of the raw text.
    pub fn with_typographer(mut self, typographer: bool) -> Self {
        self.typographer = typographer;
        self
    }
}

impl TokenTransform for HeadingAnchorPass {
    fn name(&self) -> &'static str {
        "heading-anchor"
    }

    fn apply(&self, mut tokens: Vec<Token>) -> Vec<Token> {
        let mut slugger = Slugger::new();
        for index in 0..tokens.len() {
            if !matches!(tokens[index].kind, TokenKind::HeadingOpen(_)) {
                continue;
            }
            let Some(inline) = tokens.get(index + 1).filter(|t| t.kind == TokenKind::Inline)
            else {
                continue;
            };

            let text = if self.typographer {
                Cow::Owned(apply_typography(&inline.content, None))
            } else {
                Cow::Borrowed(inline.content.as_str())
            };
            let slug = if self.dedupe {
                slugger.next_slug(&text)
            } else {
                slugify(&text)
            };
            if slug.is_empty() {
                continue;
            }

            let heading = &mut tokens[index];
            heading.attr_set("id", slug);
            heading.attr_set("tabindex", "-1");
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;
    use docblog_core::{ParseOptions, parse_mdast};

    fn ids(input: &str, dedupe: bool) -> Vec<Option<String>> {
        ids_with(HeadingAnchorPass::new(dedupe), input)
    }

    fn ids_with(pass: HeadingAnchorPass, input: &str) -> Vec<Option<String>> {
        let root = parse_mdast(input, &ParseOptions::default()).unwrap();
        pass.apply(tokenize(&root, input).tokens)
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::HeadingOpen(_)))
            .map(|t| t.attr_get("id").map(str::to_string))
            .collect()
    }

    #[test]
    fn headings_get_slug_ids() {
        assert_eq!(
            ids("# Hello World\n\n## Über `uns`\n", false),
            vec![Some("hello-world".into()), Some("über-uns".into())]
        );
    }

    #[test]
    fn tabindex_is_set() {
        let input = "## Intro\n";
        let root = parse_mdast(input, &ParseOptions::default()).unwrap();
        let tokens = HeadingAnchorPass::default().apply(tokenize(&root, input).tokens);
        assert_eq!(tokens[0].attr_get("tabindex"), Some("-1"));
    }

    #[test]
    fn duplicates_share_ids_by_default() {
        assert_eq!(
            ids("## Setup\n\n## Setup\n", false),
            vec![Some("setup".into()), Some("setup".into())]
        );
    }

    #[test]
    fn duplicates_get_suffixes_when_deduping() {
        assert_eq!(
            ids("## Setup\n\n## Setup\n", true),
            vec![Some("setup".into()), Some("setup-1".into())]
        );
    }

    #[test]
    fn unsluggable_heading_has_no_id() {
        assert_eq!(ids("## ???\n", false), vec![None]);
    }

    #[test]
    fn typographer_symbols_drop_out_of_ids() {
        let pass = HeadingAnchorPass::new(false).with_typographer(true);
        assert_eq!(ids_with(pass, "## A--B\n"), vec![Some("ab".into())]);
        assert_eq!(
            ids_with(pass, "## Copyright (c) 2024\n"),
            vec![Some("copyright-2024".into())]
        );
        assert_eq!(ids_with(pass, "## Wait...\n"), vec![Some("wait".into())]);
    }

    #[test]
    fn raw_text_ids_without_typographer() {
        assert_eq!(ids("## A--B\n", false), vec![Some("a-b".into())]);
        assert_eq!(
            ids("## Copyright (c) 2024\n", false),
            vec![Some("copyright-c-2024".into())]
        );
    }

    #[test]
    fn cjk_heading_ids() {
        assert_eq!(ids("## 快速开始\n", false), vec![Some("快速开始".into())]);
    }
}
