//! Source paths to routes, and route normalization for lookups.
//!
//! A source path such as `/docs/guide/intro.md` maps to the route
//! `/guide/intro`; `/docs/guide/index.md` maps to `/guide` and
//! `/docs/index.md` to `/`.

use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Prefix stripped from source paths unless configured otherwise.
pub const DEFAULT_DOCS_ROOT: &str = "/docs";

/// Percent-decodes `input`, keeping it unchanged when the bytes are not UTF-8.
pub fn decode(input: &str) -> Cow<'_, str> {
    match percent_decode_str(input).decode_utf8() {
        Ok(decoded) => decoded,
        Err(err) => {
            log::debug!("Keeping undecodable path `{}` as-is: {}", input, err);
            Cow::Borrowed(input)
        }
    }
}

/// Computes the route of a source file.
pub fn link_for_path(path: &str, docs_root: &str) -> String {
    let decoded = decode(path);
    let link = decoded.strip_prefix(docs_root).unwrap_or(&decoded);
    let link = link.strip_suffix(".md").unwrap_or(link);
    let link = link.strip_suffix("/index").unwrap_or(link);

    if link.starts_with('/') {
        link.to_string()
    } else {
        format!("/{link}")
    }
}

/// Route split on `/` with empty pieces removed. `/` has no segments.
pub fn segments(link: &str) -> Vec<String> {
    link.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Canonical form of a requested route: one trailing slash dropped (the
/// root stays `/`), then percent-decoded.
pub fn normalize_route(route: &str) -> String {
    if route == "/" {
        return route.to_string();
    }
    let trimmed = route.strip_suffix('/').unwrap_or(route);
    decode(trimmed).into_owned()
}

/// Directory prefix for descendant lookups. The root maps to the empty
/// prefix so every route matches `"" + "/"`.
pub fn normalize_dir(dir: &str) -> String {
    if dir == "/" {
        return String::new();
    }
    let trimmed = dir.strip_suffix('/').unwrap_or(dir);
    decode(trimmed).into_owned()
}
