#![deny(missing_docs)]
//! docblog core: frontmatter extraction, slugs, and the Markdown parse adapter.

/// Core error types.
pub mod error;
/// `---` frontmatter extraction.
pub mod frontmatter;
/// Markdown parsing utilities.
pub mod parse;
/// Slug generation utilities.
pub mod slug;

pub use error::{MarkflowError, SourceLocation};
pub use frontmatter::{Frontmatter, FrontmatterSplit, parse_frontmatter};
pub use parse::{ParseOptions, parse_mdast, parse_mdast_with_options};
pub use slug::{Slugger, slugify};
