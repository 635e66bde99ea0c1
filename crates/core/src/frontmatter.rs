use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Key/value metadata read from a leading `---` block. Values are never coerced.
pub type Frontmatter = BTreeMap<String, String>;

/// A `---` line, a lazily matched block, a closing `---` line, then the body.
static FRONTMATTER_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A---\s*\n((?s:.*?))\n---\s*\n((?s:.*))\z")
        .expect("frontmatter pattern is valid")
});

/// Result of splitting a document into frontmatter metadata and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterSplit<'a> {
    /// Parsed metadata; empty when the document has no frontmatter block.
    pub meta: Frontmatter,
    /// Document body following the closing delimiter, or the whole input.
    pub content: &'a str,
    /// Byte offset inside the input where `content` begins.
    pub body_start: usize,
}

impl<'a> FrontmatterSplit<'a> {
    fn passthrough(input: &'a str) -> Self {
        Self {
            meta: Frontmatter::new(),
            content: input,
            body_start: 0,
        }
    }

    /// True when a frontmatter block was found.
    pub fn has_frontmatter(&self) -> bool {
        self.body_start > 0
    }
}

/// Splits `input` into frontmatter metadata and the remaining body.
///
/// Malformed or absent blocks are not errors: the whole input comes back as
/// `content` with empty metadata.
///
/// ```
/// use docblog_core::frontmatter::parse_frontmatter;
///
/// let split = parse_frontmatter("---\ntitle: \"Intro\"\n---\n# Hello\n");
/// assert_eq!(split.meta.get("title").map(String::as_str), Some("Intro"));
/// assert_eq!(split.content, "# Hello\n");
/// ```
pub fn parse_frontmatter(input: &str) -> FrontmatterSplit<'_> {
    let Some(captures) = FRONTMATTER_BLOCK.captures(input) else {
        return FrontmatterSplit::passthrough(input);
    };
    let (Some(block), Some(body)) = (captures.get(1), captures.get(2)) else {
        return FrontmatterSplit::passthrough(input);
    };

    FrontmatterSplit {
        meta: parse_block(block.as_str()),
        content: body.as_str(),
        body_start: body.start(),
    }
}

fn parse_block(block: &str) -> Frontmatter {
    let mut meta = Frontmatter::new();
    for line in block.split('\n') {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        meta.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    meta
}

/// Strips one layer of matching `"` or `'` quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.starts_with(quote) && value.ends_with(quote) {
            // a lone quote character unquotes to the empty string
            return value.get(1..value.len() - 1).unwrap_or("");
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_input_when_no_frontmatter() {
        let input = "# Title\n\nBody";
        let split = parse_frontmatter(input);
        assert!(split.meta.is_empty());
        assert_eq!(split.content, input);
        assert!(!split.has_frontmatter());
    }

    #[test]
    fn parses_basic_block() {
        let input = "---\ntitle: Getting Started\ndate: 2024-01-02\n---\nBody text\n";
        let split = parse_frontmatter(input);
        assert_eq!(split.meta["title"], "Getting Started");
        assert_eq!(split.meta["date"], "2024-01-02");
        assert_eq!(split.content, "Body text\n");
        assert_eq!(&input[split.body_start..], split.content);
    }

    #[test]
    fn strips_one_layer_of_matching_quotes() {
        let split = parse_frontmatter(
            "---\na: \"double\"\nb: 'single'\nc: \"mixed'\nd: \"'nested'\"\ne: \"\n---\n",
        );
        assert_eq!(split.meta["a"], "double");
        assert_eq!(split.meta["b"], "single");
        assert_eq!(split.meta["c"], "\"mixed'");
        assert_eq!(split.meta["d"], "'nested'");
        assert_eq!(split.meta["e"], "");
    }

    #[test]
    fn splits_on_first_colon_only() {
        let split = parse_frontmatter("---\nurl: https://example.com:8080/x\n---\n");
        assert_eq!(split.meta["url"], "https://example.com:8080/x");
    }

    #[test]
    fn skips_lines_without_colon_and_empty_keys() {
        let split = parse_frontmatter("---\njust text\n: orphan\ntitle: Kept\n---\nrest");
        assert_eq!(split.meta.len(), 1);
        assert_eq!(split.meta["title"], "Kept");
        assert_eq!(split.content, "rest");
    }

    #[test]
    fn later_keys_overwrite_earlier_ones() {
        let split = parse_frontmatter("---\ntitle: One\ntitle: Two\n---\n");
        assert_eq!(split.meta["title"], "Two");
    }

    #[test]
    fn values_stay_strings() {
        let split = parse_frontmatter("---\ntags: [rust, docs]\ndraft: true\n---\n");
        assert_eq!(split.meta["tags"], "[rust, docs]");
        assert_eq!(split.meta["draft"], "true");
    }

    #[test]
    fn tolerates_trailing_whitespace_on_delimiters() {
        let split = parse_frontmatter("---   \ntitle: x\n---  \nbody");
        assert_eq!(split.meta["title"], "x");
        assert_eq!(split.content, "body");
    }

    #[test]
    fn unterminated_block_degrades_to_passthrough() {
        let input = "---\ntitle: x\nno closing fence";
        let split = parse_frontmatter(input);
        assert!(split.meta.is_empty());
        assert_eq!(split.content, input);
    }

    #[test]
    fn closing_delimiter_needs_a_newline() {
        let input = "---\ntitle: x\n---";
        assert_eq!(parse_frontmatter(input).content, input);
    }

    #[test]
    fn block_must_start_the_document() {
        let input = "\n---\ntitle: x\n---\nbody";
        assert_eq!(parse_frontmatter(input).content, input);
    }

    #[test]
    fn crlf_lines_keep_values_trimmed() {
        let split = parse_frontmatter("---\r\ntitle: Win\r\n---\r\nbody");
        assert_eq!(split.meta["title"], "Win");
        assert_eq!(split.content, "body");
    }

    #[test]
    fn body_is_lazily_delimited_by_first_closing_fence() {
        let split = parse_frontmatter("---\na: 1\n---\nbody\n---\nmore\n");
        assert_eq!(split.meta.len(), 1);
        assert_eq!(split.content, "body\n---\nmore\n");
    }

    mod props {
        use super::super::parse_frontmatter;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn text_without_leading_fence_passes_through(text in "[^-][\\PC\\n]{0,80}") {
                let split = parse_frontmatter(&text);
                prop_assert!(split.meta.is_empty());
                prop_assert_eq!(split.content, text.as_str());
            }
        }
    }
}
