use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

// `\u{FEFF}` is whitespace for the anchor links already published by the site.
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s\x{FEFF}_\-]").expect("slug pattern is valid"));
static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\x{FEFF}_]+").expect("slug pattern is valid"));
static HYPHEN_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("slug pattern is valid"));

/// Converts heading text into a URL-safe, Unicode-aware anchor id.
///
/// 1. Lowercase
/// 2. Drop everything except letters, numbers, whitespace, `_` and `-`
/// 3. Collapse whitespace/underscore runs into `-`
/// 4. Collapse hyphen runs and strip them from both ends
///
/// Non-Latin scripts are kept as-is. Equal inputs always produce equal
/// slugs; use [`Slugger`] when ids must be unique within a document.
///
/// # Examples
///
/// ```
/// use docblog_core::slug::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("多言語 ガイド"), "多言語-ガイド");
/// ```
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept = DISALLOWED.replace_all(&lowered, "");
    let separated = SEPARATORS.replace_all(&kept, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&separated, "-");
    collapsed.trim_matches('-').trim().to_string()
}

/// Deduplicating slug generator: repeats become `slug-1`, `slug-2`, ...
#[derive(Debug, Default)]
pub struct Slugger {
    counts: HashMap<String, usize>,
}

impl Slugger {
    /// Creates a new slugger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the next unique slug for the given heading text.
    ///
    /// Text without any sluggable characters yields an empty slug, which is
    /// never counted.
    pub fn next_slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        if base.is_empty() {
            return base;
        }

        let mut seen = self.counts.get(&base).copied().unwrap_or(0);
        let mut candidate = base.clone();
        if seen > 0 {
            candidate = format!("{base}-{seen}");
            while self.counts.contains_key(&candidate) {
                seen += 1;
                candidate = format!("{base}-{seen}");
            }
            self.counts.insert(candidate.clone(), 1);
        }
        self.counts.insert(base, seen + 1);
        candidate
    }
}
