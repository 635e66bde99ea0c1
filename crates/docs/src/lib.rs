#![deny(missing_docs)]
//! docblog documents: routes, the cached loader, the navigation tree,
//! search, site configuration and page rendering.

/// Site configuration.
pub mod config;
/// Immutable index snapshots.
pub mod index;
/// The cached loader.
pub mod loader;
/// Raw sources and document records.
pub mod record;
/// Source paths and routes.
pub mod route;
/// Title and body search.
pub mod search;
/// Site composition.
pub mod site;
/// Document sources.
pub mod source;
/// Navigation tree.
pub mod tree;

pub use config::{
    ConfigError, LoaderOptions, SearchConfig, SiteConfig, SocialLink, ThemeConfig, ThemeMode,
};
pub use index::DocumentIndex;
pub use loader::DocumentLoader;
pub use record::{DocumentRecord, RawDocument};
pub use route::{DEFAULT_DOCS_ROOT, link_for_path, normalize_route};
pub use site::{Page, Site};
pub use source::{DocumentSource, SourceFn};
pub use tree::{TreeItem, TreeNode};
