//! Raw sources and the records the loader builds from them.

use crate::route::{link_for_path, segments};
use docblog_core::{Frontmatter, parse_frontmatter};
use serde::{Deserialize, Serialize};

/// One Markdown source as handed to the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Source path, e.g. `/docs/guide/intro.md`.
    pub path: String,
    /// Full file text.
    pub text: String,
}

impl RawDocument {
    /// Creates a raw document.
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// A loaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRecord {
    /// Canonical route (`/`, `/guide`, `/guide/intro`).
    pub link: String,
    /// Frontmatter title, or the last route segment, or `Home`.
    pub title: String,
    /// Frontmatter key/value pairs.
    pub meta: Frontmatter,
    /// Full source text, frontmatter included.
    pub content: String,
    /// Route split on `/`.
    pub segments: Vec<String>,
    /// Path the record was loaded from.
    pub raw_path: String,
    /// Frontmatter `date`, if set.
    pub date: Option<String>,
    /// Frontmatter `tags`.
    pub tags: Vec<String>,
    #[serde(skip)]
    body_start: usize,
}

impl DocumentRecord {
    /// Builds a record, stripping `docs_root` from the source path.
    pub fn from_raw(raw: &RawDocument, docs_root: &str) -> Self {
        let split = parse_frontmatter(&raw.text);
        let body_start = split.body_start;
        let meta = split.meta;

        let link = link_for_path(&raw.path, docs_root);
        let segments = segments(&link);
        let title = non_empty(&meta, "title")
            .or_else(|| segments.last().cloned())
            .unwrap_or_else(|| "Home".to_string());
        let date = non_empty(&meta, "date");
        let tags = meta.get("tags").map(|t| parse_tags(t)).unwrap_or_default();

        Self {
            link,
            title,
            meta,
            content: raw.text.clone(),
            segments,
            raw_path: raw.path.clone(),
            date,
            tags,
            body_start,
        }
    }

    /// Text after the frontmatter block.
    pub fn body(&self) -> &str {
        self.content.get(self.body_start..).unwrap_or_default()
    }

    /// Number of route segments; the root page is 0.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

fn non_empty(meta: &Frontmatter, key: &str) -> Option<String> {
    meta.get(key).filter(|v| !v.is_empty()).cloned()
}

/// Parses `[a, "b"]` or `a, b` into a tag list.
pub fn parse_tags(value: &str) -> Vec<String> {
    let value = value.trim();
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or(value);

    inner
        .split(',')
        .map(|tag| unquote(tag.trim()).trim())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, text: &str) -> DocumentRecord {
        DocumentRecord::from_raw(&RawDocument::new(path, text), "/docs")
    }

    #[test]
    fn title_from_frontmatter() {
        let doc = record("/docs/guide/intro.md", "---\ntitle: Introduction\n---\nHello\n");
        assert_eq!(doc.link, "/guide/intro");
        assert_eq!(doc.title, "Introduction");
        assert_eq!(doc.segments, vec!["guide", "intro"]);
        assert_eq!(doc.raw_path, "/docs/guide/intro.md");
    }

    #[test]
    fn title_falls_back_to_segment_then_home() {
        assert_eq!(record("/docs/guide/setup.md", "x").title, "setup");
        assert_eq!(record("/docs/guide/setup.md", "---\ntitle:\n---\nx").title, "setup");
        assert_eq!(record("/docs/index.md", "x").title, "Home");
    }

    #[test]
    fn content_keeps_frontmatter_and_body_skips_it() {
        let text = "---\ntitle: A\n---\n# Body\n";
        let doc = record("/docs/a.md", text);
        assert_eq!(doc.content, text);
        assert_eq!(doc.body(), "# Body\n");
    }

    #[test]
    fn body_without_frontmatter_is_everything() {
        let doc = record("/docs/a.md", "# Only\n");
        assert_eq!(doc.body(), "# Only\n");
    }

    #[test]
    fn date_and_tags() {
        let doc = record(
            "/docs/post.md",
            "---\ndate: 2024-05-01\ntags: [rust, \"web\", 'docs', ]\n---\n",
        );
        assert_eq!(doc.date.as_deref(), Some("2024-05-01"));
        assert_eq!(doc.tags, vec!["rust", "web", "docs"]);
        assert_eq!(record("/docs/x.md", "x").date, None);
        assert!(record("/docs/x.md", "x").tags.is_empty());
    }

    #[test]
    fn tags_without_brackets() {
        assert_eq!(parse_tags("a, b"), vec!["a", "b"]);
        assert_eq!(parse_tags("single"), vec!["single"]);
        assert!(parse_tags("[]").is_empty());
    }

    #[test]
    fn depth_counts_segments() {
        assert_eq!(record("/docs/index.md", "").depth(), 0);
        assert_eq!(record("/docs/a/b/c.md", "").depth(), 3);
    }
}
