//! Rendering options.

use crate::code_block::DEFAULT_COLLAPSE_THRESHOLD;
use docblog_core::ParseOptions;
use serde::{Deserialize, Serialize};

/// Options for [`crate::MarkdownEngine`]. Missing fields take their defaults
/// when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Code blocks with more lines than this start collapsed.
    pub collapse_threshold: usize,
    /// Smart quotes, dashes, ellipsis and symbol replacements in text.
    pub typographer: bool,
    /// Turn bare URLs into links.
    pub linkify: bool,
    /// Pass raw HTML through; when off it is escaped.
    pub allow_html: bool,
    /// Prefix headings with a `#` permalink anchor.
    pub heading_permalinks: bool,
    /// Give repeated headings `-1`, `-2` suffixed ids instead of sharing one.
    pub dedupe_heading_ids: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            collapse_threshold: DEFAULT_COLLAPSE_THRESHOLD,
            typographer: true,
            linkify: true,
            allow_html: true,
            heading_permalinks: true,
            dedupe_heading_ids: false,
        }
    }
}

impl RenderOptions {
    /// Parser settings matching these options.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            raw_html: self.allow_html,
            autolink_literals: self.linkify,
            ..ParseOptions::markdown()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.collapse_threshold, 40);
        assert!(options.typographer && options.linkify && options.allow_html);
        assert!(options.heading_permalinks);
        assert!(!options.dedupe_heading_ids);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let options: RenderOptions =
            serde_json::from_str(r#"{ "collapse_threshold": 30, "allow_html": false }"#).unwrap();
        assert_eq!(options.collapse_threshold, 30);
        assert!(!options.allow_html);
        assert!(options.typographer);
    }

    #[test]
    fn parse_options_follow_flags() {
        let options = RenderOptions {
            allow_html: false,
            linkify: false,
            ..RenderOptions::default()
        };
        let parse = options.parse_options();
        assert!(!parse.raw_html);
        assert!(!parse.autolink_literals);
        assert!(parse.gfm);
    }
}
